//! Terminal output for the interactive advisor.

const WIDTH: usize = 54;

pub fn header() {
    println!();
    println!("  {}", "═".repeat(WIDTH + 2));
    println!("  ║{:^WIDTH$}║", "WATCH INSURANCE ADVISOR");
    println!("  ║{:^WIDTH$}║", "Your Personal Insurance Consultant");
    println!("  {}", "═".repeat(WIDTH + 2));
    println!();
}

pub fn advisor(reply: &str) {
    println!("\n  Advisor: {reply}\n");
}

pub fn hint() {
    println!("  {}", "─".repeat(WIDTH));
    println!("  Type 'quit' or 'exit' to end the conversation");
    println!("  {}", "─".repeat(WIDTH));
    println!();
}

pub fn farewell() {
    println!("\n  {}\n", "─".repeat(WIDTH));
    println!("  Advisor: Thank you for chatting with me today. Take care,");
    println!("           and best of luck with your decision!");
    println!("\n  {}\n", "━".repeat(WIDTH));
}

pub fn interrupted() {
    println!("\n  {}\n", "─".repeat(WIDTH));
    println!("  Advisor: No problem, feel free to come back anytime!");
    println!("\n  {}\n", "━".repeat(WIDTH));
}
