//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthService, AuthServiceImpl, ConversationService, ConversationServiceImpl,
    CredentialService, JwtCredentialService, MessageService, MessageServiceImpl, UserService,
    UserServiceImpl,
};
use crate::config::Settings;
use crate::domain::{ConversationRepository, MessageRepository, UserRepository};
use crate::infrastructure::database;
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::repositories::{
    PgConversationRepository, PgMessageRepository, PgUserRepository,
};
use crate::presentation::http::{create_router, handlers::health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub conversations: Arc<dyn ConversationService>,
    pub messages: Arc<dyn MessageService>,
    /// `None` when running on the in-memory store
    pub db: Option<PgPool>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State backed by PostgreSQL repositories
    pub fn with_postgres(pool: PgPool, settings: Settings) -> Self {
        Self::from_repositories(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgConversationRepository::new(pool.clone())),
            Arc::new(PgMessageRepository::new(pool.clone())),
            Some(pool),
            settings,
        )
    }

    /// State backed by a fresh process-local store
    pub fn in_memory(settings: Settings) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::from_repositories(store.clone(), store.clone(), store, None, settings)
    }

    fn from_repositories<U, C, M>(
        user_repo: Arc<U>,
        conversation_repo: Arc<C>,
        message_repo: Arc<M>,
        db: Option<PgPool>,
        settings: Settings,
    ) -> Self
    where
        U: UserRepository + 'static,
        C: ConversationRepository + 'static,
        M: MessageRepository + 'static,
    {
        let credentials: Arc<dyn CredentialService> =
            Arc::new(JwtCredentialService::new(settings.jwt.clone()));

        Self {
            auth: Arc::new(AuthServiceImpl::new(user_repo.clone(), credentials.clone())),
            users: Arc::new(UserServiceImpl::new(user_repo.clone(), credentials)),
            conversations: Arc::new(ConversationServiceImpl::new(
                user_repo.clone(),
                conversation_repo.clone(),
                message_repo.clone(),
            )),
            messages: Arc::new(MessageServiceImpl::new(
                user_repo,
                conversation_repo,
                message_repo,
            )),
            db,
            settings: Arc::new(settings),
        }
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let state = if settings.database.is_configured() {
            let pool = database::create_pool(&settings.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            tracing::info!("Database connection pool created");

            if settings.database.run_migrations {
                database::run_migrations(&pool)
                    .await
                    .context("failed to run database migrations")?;
                tracing::info!("Database migrations applied");
            }

            AppState::with_postgres(pool, settings.clone())
        } else {
            tracing::warn!("database.url is empty, using in-memory store");
            AppState::in_memory(settings.clone())
        };

        let router = create_router(state);

        let listener = TcpListener::bind(settings.server_addr())
            .await
            .with_context(|| format!("failed to bind {}", settings.server_addr()))?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
