use pdf_quiz::{Config, Quiz, logging};

#[tokio::main]
async fn main() {
    let config = Config::from_args();

    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = Quiz::new(config).run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
