//! reservation-checkout - resolve one reservation and follow it to its view.
//!
//! ```text
//! reservation-checkout <event|subscription> <context-id> <reservation-id> [current-view]
//! ```
//!
//! Routes the reservation to its canonical view. When that view is the
//! processing page, polls until the payment confirmation lands and prints
//! where the buyer ends up.

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use reservation_checkout::adapters::{
    ChannelChallengeSolver, ChannelNavigator, HttpEmbeddingNotifier, HttpReservationClient,
    LoggingEmbeddingNotifier,
};
use reservation_checkout::application::{
    decide, ActivationOutcome, PaymentConfirmationPoller, PollTarget, PollerPhase,
    ReservationActions, ReservationRouter,
};
use reservation_checkout::config::{AppConfig, LogFormat, LoggingConfig, ValidationError};
use reservation_checkout::domain::foundation::{PurchaseContextId, ReservationId, StateMachine};
use reservation_checkout::domain::reservation::{
    CanonicalView, PurchaseContext, PurchaseContextType, Route,
};
use reservation_checkout::ports::{EmbeddingNotifier, NavigationEvent, ReservationClient};

const USAGE: &str =
    "usage: reservation-checkout <event|subscription> <context-id> <reservation-id> [current-view]";

#[derive(Debug, Error)]
enum ArgsError {
    #[error("{USAGE}")]
    Usage,

    #[error("invalid purchase context type: {0}")]
    ContextType(String),

    #[error("invalid identifier: {0}")]
    Identifier(String),

    #[error("unknown view: {0}")]
    View(String),
}

struct CheckoutArgs {
    context: PurchaseContext,
    reservation_id: ReservationId,
    current_view: CanonicalView,
}

impl CheckoutArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let kind = args.next().ok_or(ArgsError::Usage)?;
        let context_id = args.next().ok_or(ArgsError::Usage)?;
        let reservation_id = args.next().ok_or(ArgsError::Usage)?;

        let kind: PurchaseContextType = kind.parse().map_err(|_| ArgsError::ContextType(kind))?;
        let context_id = PurchaseContextId::new(context_id)
            .map_err(|e| ArgsError::Identifier(e.to_string()))?;
        let reservation_id =
            ReservationId::new(reservation_id).map_err(|e| ArgsError::Identifier(e.to_string()))?;
        let current_view = match args.next() {
            Some(view) => CanonicalView::from_path_suffix(&view).ok_or(ArgsError::View(view))?,
            None => CanonicalView::Overview,
        };

        Ok(Self {
            context: PurchaseContext::new(kind, context_id),
            reservation_id,
            current_view,
        })
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), ValidationError> {
    let registry = tracing_subscriber::registry().with(logging.env_filter()?);
    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
    Ok(())
}

fn print_destination(event: Option<NavigationEvent>, landing: &Route) {
    match event {
        Some(NavigationEvent::Route(route)) => println!("{}", route.path()),
        Some(NavigationEvent::External(url)) => println!("{url}"),
        None => println!("{}", landing.path()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let args = CheckoutArgs::parse(std::env::args().skip(1))?;

    // No interactive UI here: every challenge is abandoned.
    let (solver, mut challenges) = ChannelChallengeSolver::new();
    tokio::spawn(async move {
        while let Some(request) = challenges.recv().await {
            tracing::warn!("Backend requires an interactive challenge, abandoning");
            request.abandon();
        }
    });

    let client: Arc<dyn ReservationClient> = Arc::new(HttpReservationClient::new(
        &config.backend,
        &config.challenge,
        Arc::new(solver),
    )?);
    let notifier: Arc<dyn EmbeddingNotifier> =
        match HttpEmbeddingNotifier::from_config(&config.embedding, &config.backend)? {
            Some(notifier) => Arc::new(notifier),
            None => Arc::new(LoggingEmbeddingNotifier),
        };
    let (navigator, mut navigation) = ChannelNavigator::new();
    let router = Arc::new(ReservationRouter::new(
        Arc::clone(&client),
        Arc::new(navigator),
    ));

    tracing::info!(
        backend = %config.backend.normalized_base_url(),
        reservation_id = %args.reservation_id,
        current_view = %args.current_view,
        "Resolving reservation"
    );

    let ticket = router.begin();
    let reservation = router.guard().fetch(&args.reservation_id).await;
    let decision = decide(&args.context, &reservation, args.current_view);
    let landing = match router.apply(ticket, decision) {
        ActivationOutcome::Redirected(route) => route,
        ActivationOutcome::Stayed | ActivationOutcome::Superseded => Route::new(
            args.context.clone(),
            args.reservation_id.clone(),
            args.current_view,
        ),
    };
    while navigation.try_recv().is_ok() {}

    match landing.view {
        CanonicalView::Processing => {}
        CanonicalView::OfflinePayment => {
            let actions = ReservationActions::new(Arc::clone(&client));
            println!("{}", landing.path());
            if let Some(details) = actions.offline_payment_details(&args.reservation_id).await? {
                println!("{}", details.name);
                if let Some(instructions) = details.instructions {
                    println!("{instructions}");
                }
            }
            return Ok(());
        }
        _ => {
            println!("{}", landing.path());
            return Ok(());
        }
    }

    let poller = PaymentConfirmationPoller::new(
        PollTarget {
            context: args.context.clone(),
            reservation_id: args.reservation_id.clone(),
            baseline: reservation.status,
        },
        client,
        router,
        notifier,
        config.poller.clone(),
    );
    let mut updates = poller.subscribe();
    poller.start()?;

    loop {
        tokio::select! {
            event = navigation.recv() => {
                print_destination(event, &landing);
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *updates.borrow_and_update();
                if snapshot.phase == PollerPhase::Resolved {
                    // Re-resolution navigates shortly after, unless the view stays.
                    let event = tokio::time::timeout(config.backend.request_timeout(), navigation.recv())
                        .await
                        .unwrap_or(None);
                    print_destination(event, &landing);
                    break;
                }
                if snapshot.phase.is_terminal() {
                    tracing::info!(phase = ?snapshot.phase, "Polling stopped");
                    break;
                }
                if snapshot.force_check_visible {
                    tracing::info!(checks = snapshot.check_count, "Confirmation is slow, running a force check");
                    let outcome = poller.force_check().await;
                    tracing::info!(?outcome, "Force check finished");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                poller.cancel();
                break;
            }
        }
    }

    Ok(())
}
