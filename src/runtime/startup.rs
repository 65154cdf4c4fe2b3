use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::jwt::JwtService;
use crate::config::StaticConfig;
use crate::domain::{Argon2Hasher, CodeGenerator, CredentialHasher, IdentityStore, LinkRegistry};
use crate::services::{AuthService, LinkService};

/// Demo accounts created by `--seed-demo`
pub const DEMO_EMAILS: [&str; 2] = ["user@example.com", "user2@example.com"];
pub const DEMO_PASSWORD: &str = "purple-monkey-dinosaur";
const DEMO_TARGETS: [&str; 2] = ["http://www.lighthouselabs.ca", "http://www.google.com"];

/// Shared state handed to every worker
pub struct StartupContext {
    pub identities: Arc<IdentityStore>,
    pub registry: Arc<LinkRegistry>,
    pub auth_service: Arc<AuthService>,
    pub link_service: Arc<LinkService>,
}

impl StartupContext {
    /// Wire the stores and services from config with an explicit hasher
    pub fn with_hasher(config: &StaticConfig, hasher: Arc<dyn CredentialHasher>) -> Self {
        let identities = Arc::new(IdentityStore::new(hasher));
        let registry = Arc::new(LinkRegistry::new(CodeGenerator::new(
            config.links.code_length,
        )));
        let jwt = JwtService::from_config(&config.auth);

        Self {
            auth_service: Arc::new(AuthService::new(Arc::clone(&identities), jwt)),
            link_service: Arc::new(LinkService::new(Arc::clone(&registry))),
            identities,
            registry,
        }
    }

    /// 注册演示账号并为第一个账号创建两条链接
    pub async fn seed_demo(&self) -> Result<()> {
        let mut first = None;
        for email in DEMO_EMAILS {
            let session = self
                .auth_service
                .register(email, DEMO_PASSWORD)
                .await
                .with_context(|| format!("Failed to register demo account {}", email))?;
            first.get_or_insert(session.account);
        }

        if let Some(owner) = first {
            for target in DEMO_TARGETS {
                let link = self
                    .link_service
                    .create_link(Some(&owner), target)
                    .context("Failed to create demo link")?;
                debug!("Demo link {} -> {}", link.code, link.target);
            }
        }

        warn!(
            "Demo data seeded: {} accounts, {} links (password '{}')",
            self.identities.len(),
            self.registry.len(),
            DEMO_PASSWORD
        );
        Ok(())
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &StaticConfig, seed_demo: bool) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let context = StartupContext::with_hasher(config, Arc::new(Argon2Hasher));
    info!(
        "Link registry ready, short code length {}",
        config.links.code_length
    );

    if seed_demo {
        context.seed_demo().await?;
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
