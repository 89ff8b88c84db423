mod args;
mod inspect;

use anyhow::Context;
use clap::Parser;
use stalewise_cache::{CachePolicy, SystemClock};
use stalewise_config::StalewiseConfig;
use tokio::io::AsyncReadExt;
use tracing::info;
use utils::init_tracing;

use args::{Args, Input};
use inspect::{describe, parse_response_head};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg = StalewiseConfig::from_file_or_default(&args.config);
    init_tracing(cfg.global().log_level());

    let raw = read_input(&args.source()).await?;
    let head = parse_response_head(&raw)?;
    info!(
        target: "stalewise::inspect",
        status = %head.status,
        headers = head.headers.len(),
        method = %args.method,
        "Inspecting response"
    );

    let policy = CachePolicy::new(cfg.cache());
    let report = describe(&policy, &args.method, &head, SystemClock)
        .context("render inspection report")?;
    print!("{report}");

    Ok(())
}

async fn read_input(input: &Input) -> anyhow::Result<Vec<u8>> {
    match input {
        Input::Stdin => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("read response head from stdin")?;
            Ok(buf)
        }
        Input::File(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("read response head from '{path}'")),
    }
}
