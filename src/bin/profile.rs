use mazerun::app::{App, AppConfig};

/// Side of the profiled maze. Union relabels scan the whole grid, so the full 255x255
/// bound makes generation dominate every run.
const PROFILE_SIDE: usize = 100;

fn main() -> std::io::Result<()> {
    let _guard = mazerun::init_logging();
    let app = App::new(AppConfig {
        seed: mazerun::seed_from_env(),
        ..AppConfig::default()
    });

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok());
    app.profile(PROFILE_SIDE, PROFILE_SIDE, num_iters)?;
    Ok(())
}
