mod bot;
mod command;
mod schema;
mod score_store;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
