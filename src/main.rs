fn main() {
    if let Err(err) = prettylog::run() {
        prettylog::printer::error(format!("prettylog: {}", err));
        std::process::exit(1);
    }
}
