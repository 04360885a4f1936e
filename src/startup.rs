use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{company_route, default_route},
    services::EnrichmentPipeline,
};

pub fn run(listener: TcpListener, pipeline: EnrichmentPipeline) -> Result<Server, std::io::Error> {
    let pipeline = web::Data::new(pipeline);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::health_check)
            .service(
                web::scope("/companies")
                    .app_data(
                        web::PathConfig::default()
                            .error_handler(company_route::invalid_company_id),
                    )
                    .service(company_route::analyze_website)
                    .service(company_route::detect_tech)
                    .service(company_route::extract_services)
                    .service(company_route::generate_description),
            )
            .app_data(pipeline.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
