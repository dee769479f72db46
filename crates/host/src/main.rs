mod agents;
mod settings;
mod toolsets;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use arogyam_core::chat_client::ChatCompletionsClient;

use agents::AgentRunner;
use settings::Settings;
use toolsets::ToolRegistry;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // Initialize services
    let settings = Settings::from_env()?;
    let client = ChatCompletionsClient::from_env()?;

    let root = agents::root_agent(&settings, chrono::Local::now().date_naive());
    root.validate()?;
    let tools = ToolRegistry::connect(&root);
    let runner = AgentRunner::new(&client, &tools).with_max_steps(settings.max_steps);

    tracing::info!(agent = %root.name, model = %settings.model, surge_tool = %settings.surge_tool.command, "ready");
    println!("\nArogyam Hospital Resource Assistant");
    println!("Type your question and press Enter. Type 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let task = input.trim();

        if task.is_empty() {
            continue;
        }
        if task.eq_ignore_ascii_case("quit") || task.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        match runner.run(&root, task) {
            Ok(answer) => println!("\n{answer}\n"),
            Err(e) => println!("\n[ERROR] {e:#}\n"),
        }
    }

    Ok(())
}
