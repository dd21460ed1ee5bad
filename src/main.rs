fn main() {
  if let Err(e) = lift_log_lib::run() {
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }
}
