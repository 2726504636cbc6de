pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_queries::OrderQueries;
use application::order_service::OrderService;
use infrastructure::catalog::DieselCatalog;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

/// The service and query facade as wired against diesel in production.
pub type AppService = OrderService<DieselOrderRepository, DieselCatalog>;
pub type AppQueries = OrderQueries<DieselOrderRepository>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::list_own_orders,
        handlers::orders::get_order,
        handlers::orders::update_status,
        handlers::orders::assign_rider,
        handlers::orders::list_all_orders,
        handlers::orders::kitchen_queue,
        handlers::orders::rider_queue,
        handlers::menu::list_categories,
        handlers::menu::list_category_items,
        handlers::menu::item_details,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::CreateOrderItemRequest,
        handlers::orders::CreateOrderResponse,
        handlers::orders::OrderResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderDetailsResponse,
        handlers::orders::UpdateStatusRequest,
        handlers::orders::UpdateStatusResponse,
        handlers::orders::AssignRiderRequest,
        handlers::menu::CategoryResponse,
        handlers::menu::MenuItemResponse,
        handlers::menu::MenuItemDetailsResponse,
        handlers::menu::CustomizationOptionResponse,
        handlers::menu::CustomizationValueResponse,
        domain::order::OrderStatus,
        domain::order::PaymentMethod,
        domain::order::PaymentStatus,
        domain::auth::Role,
    ))
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let repo = DieselOrderRepository::new(pool.clone());
    let catalog = DieselCatalog::new(pool);
    let service = web::Data::new(OrderService::new(repo.clone(), catalog.clone()));
    let queries = web::Data::new(OrderQueries::new(repo));
    let catalog = web::Data::new(catalog);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(queries.clone())
            .app_data(catalog.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_own_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}/status", web::put().to(handlers::orders::update_status))
                    .route("/{id}/rider", web::put().to(handlers::orders::assign_rider)),
            )
            .service(
                web::scope("/admin")
                    .route("/orders", web::get().to(handlers::orders::list_all_orders)),
            )
            .service(
                web::scope("/kitchen")
                    .route("/queue", web::get().to(handlers::orders::kitchen_queue)),
            )
            .service(
                web::scope("/rider")
                    .route("/queue", web::get().to(handlers::orders::rider_queue)),
            )
            .service(
                web::scope("/menu")
                    .route("/categories", web::get().to(handlers::menu::list_categories))
                    .route(
                        "/categories/{id}/items",
                        web::get().to(handlers::menu::list_category_items),
                    )
                    .route("/items/{id}", web::get().to(handlers::menu::item_details)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
