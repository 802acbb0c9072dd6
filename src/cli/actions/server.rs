use crate::cli::actions::Action;
use crate::veriform::{
    auth::{
        service::{IntendedRedirector, SessionServiceReader, TokenServiceFulfiller},
        AuthBindings,
    },
    new,
};
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    if let Action::Server {
        port,
        token_url,
        session_url,
        dashboard_url,
    } = action
    {
        let bindings = Arc::new(AuthBindings {
            sessions: Arc::new(SessionServiceReader::new(&session_url)?),
            fulfiller: Arc::new(TokenServiceFulfiller::new(&token_url)?),
            redirector: Arc::new(IntendedRedirector::new(dashboard_url)),
        });

        new(port, bindings).await?;
    }

    Ok(())
}
