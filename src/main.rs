use plexus::FieldConfig;

fn main() {
    env_logger::init();

    // An optional JSON config path as the only argument.
    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| FieldConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => FieldConfig::default(),
    };

    if let Err(e) = plexus::viewer::run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
