use std::path::Path;

use anyhow::Result;

use settings_reader::{FileStorage, Reader};

/// Prints every setting of a configuration file, then why reading stopped.
/// Run with `RUST_LOG=trace` to see the parser's diagnostics.
fn main() -> Result<()> {
    env_logger::init();

    // Change this to the file you want to inspect
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "test-assets/settings.cfg".to_owned());
    let path = Path::new(&path);

    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("{} is not a file", path.display()))?;

    let storage = FileStorage::new(root);
    let mut reader = Reader::open(&storage, name, 255)?;

    while reader.next_setting() {
        if let Some(setting) = reader.setting() {
            println!(
                "{:>4}: {} = {:?}",
                reader.line_number(),
                String::from_utf8_lossy(setting.name()),
                String::from_utf8_lossy(setting.value())
            );
        }
    }
    println!("stopped: {:?}", reader.stop_reason());

    reader.close();
    Ok(())
}
