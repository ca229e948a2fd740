use anyhow::Result;

fn main() -> Result<()> {
    messenger_archive_loader::cli::run()
}
