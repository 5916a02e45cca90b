fn main() {
    std::process::exit(reading_time_app::run(std::env::args().collect()));
}
