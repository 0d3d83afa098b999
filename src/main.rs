use anyhow::Result;
use clap::Parser;
use jobpipe::{
    cli::{execute_run, Cli},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose)?;

    match execute_run(cli).await {
        Ok(summary) => {
            if summary.serialize_errors > 0 {
                eprintln!(
                    "⚠️  {}件のタスクで結果のシリアライズに失敗しました",
                    summary.serialize_errors
                );
            }
        }
        Err(error) => {
            eprintln!("❌ エラー: {error:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}
