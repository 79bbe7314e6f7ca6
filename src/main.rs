fn main() {
    if let Err(err) = csv_relay_lib::run() {
        eprintln!("csv-relay: {}", err);
        std::process::exit(1);
    }
}
