use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use flowdeck_server::connection::ws_index;
use flowdeck_server::server::spawn_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let srv_tx = spawn_server();

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .data(srv_tx.clone())
            .route("/ws/", web::get().to(ws_index))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
