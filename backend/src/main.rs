use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = backend::Args::parse();
    backend::run(args).await
}
