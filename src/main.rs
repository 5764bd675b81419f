use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = holographer::cli::parse();
    app::run(args)
}
