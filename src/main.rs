use anyhow::Result;
use kube_render::cli::{App, Args};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse_args();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Diagnostics share stdout with the manifest; logs stay on stderr
            println!("ERROR occurred: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let app = App::from_args(&args)?;
    app.run(args).await
}
