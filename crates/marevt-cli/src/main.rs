mod clips;
mod command;
mod config;
mod dataset;
mod logging;
mod sidecar;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
