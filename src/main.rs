use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use log::info;

use trash_classifier::config::ServeArgs;
use trash_classifier::{handlers, logging};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();
    logging::init();

    let classifier = web::Data::new(args.model.load()?);
    let spool = web::Data::new(args.spool());

    info!("Server running at http://{}:{}", args.host, args.port);

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(classifier.clone())
            .app_data(spool.clone())
            .configure(handlers::configure)
    });
    if let Some(workers) = args.workers {
        server = server.workers(workers);
    }

    server.bind((args.host.as_str(), args.port))?.run().await?;
    Ok(())
}
