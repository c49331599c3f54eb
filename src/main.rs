use clap::Parser;
use github_email_getter_lib::{Args, EmailGetter};
use std::error::Error;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so stdout stays one-result-per-line.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    debug!("Starting lookup for '{}'", args.username);

    let getter = EmailGetter::new(&args)?;
    let found = getter.run(&args).await;

    for value in found {
        println!("{}", value);
    }

    Ok(())
}
