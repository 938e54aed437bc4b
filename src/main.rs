use anyhow::Result;
use std::io::{self, BufRead, Write};
use toggle_props::{App, load_scene};
use tracing::{info, warn};

fn print_views(app: &App) {
    for (index, line) in app.render().iter().enumerate() {
        println!("{}: {}", index, line);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting toggle props demo");

    let scene = load_scene()?;
    let app = App::new(&scene)?;

    app.provider().subscribe(|on| {
        info!("Toggle is now {}", if on { "on" } else { "off" });
    });

    println!("{}", app.name());
    print_views(&app);

    let stdin = io::stdin();
    loop {
        print!("control index (q to quit)> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input == "q" {
            break;
        }

        match input.parse::<usize>() {
            Ok(index) => {
                if let Err(e) = app.click(index) {
                    warn!("Click failed: {:#}", e);
                }
                print_views(&app);
            }
            Err(_) => warn!("Expected a control index, got '{}'", input),
        }
    }

    info!("Exiting");
    Ok(())
}
