use cargomarket::domain::RandomTrackingGenerator;
use cargomarket::notify::{EventBus, SmsNotifier};
use cargomarket::service::dispatcher::spawn_event_dispatcher;
use cargomarket::service::{
    spawn_settlement_job, CargoService, CommissionService, CouponService, PricingService,
};
use cargomarket::{api, config::Config, db::init_db, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Initialize database and dependencies
    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(pool));

    let tracking = Arc::new(match config.tracking_seed {
        Some(seed) => RandomTrackingGenerator::with_seed(seed),
        None => RandomTrackingGenerator::from_entropy(),
    });

    let (bus, receiver) = EventBus::channel();
    let events = Arc::new(bus);

    let cargo_service = Arc::new(CargoService::new(
        repo.clone(),
        events.clone(),
        tracking,
        config.tracking_base_url.clone(),
    ));
    let pricing_service = Arc::new(PricingService::new(repo.clone()));
    let coupon_service = Arc::new(CouponService::new(repo.clone()));
    let commission_service = Arc::new(CommissionService::new(repo.clone()));

    let notifier = Arc::new(SmsNotifier::new(config.sms_gateway_url.clone()));
    spawn_event_dispatcher(receiver, notifier, commission_service.clone());

    if config.settlement_job_enabled {
        spawn_settlement_job(commission_service.clone());
    }

    // Create router
    let app = api::create_router(api::AppState {
        repo,
        config,
        cargo_service,
        pricing_service,
        coupon_service,
        commission_service,
    });

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
