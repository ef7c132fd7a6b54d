fn main() {
    if let Err(err) = timetable_grid::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
