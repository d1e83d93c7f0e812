use mazerun::app::{App, AppConfig};

fn main() -> std::io::Result<()> {
    let _guard = mazerun::init_logging();
    let mut app = App::new(AppConfig {
        seed: mazerun::seed_from_env(),
        ..AppConfig::default()
    });

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    result
}
