mod app;
mod logging;

fn main() {
    let args = short_link::cli::parse();
    std::process::exit(app::run(args));
}
