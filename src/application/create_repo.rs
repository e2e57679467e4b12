//! Create remote repository use case

use crate::error::{Result, TcacheError};
use crate::infrastructure::github::{HostingApi, RepositoryId, REPOSITORY_DESCRIPTION};
use crate::infrastructure::SyncConfig;
use tracing::info;

/// What `ensure_remote_repository` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoProvisioning {
    AlreadyExists,
    Created,
}

/// Make sure the configured repository exists, creating it as private if absent.
///
/// Only a 404 on lookup leads to a create call, and at most one is made.
pub fn ensure_remote_repository<H: HostingApi>(
    api: &H,
    config: &SyncConfig,
) -> Result<RepoProvisioning> {
    if !config.has_credentials() {
        return Err(TcacheError::Configuration(
            "GitHub sync is not configured. Run 'tcache github setup' first.".to_string(),
        ));
    }

    let repo: RepositoryId = config.repository.parse()?;
    let token = config.token.trim();

    let lookup = api.get_repository(&repo, token)?;
    match lookup.status {
        200 => {
            info!(%repo, "repository already exists");
            Ok(RepoProvisioning::AlreadyExists)
        }
        404 => {
            info!(%repo, "creating private repository");
            let created = api.create_repository(&repo.name, REPOSITORY_DESCRIPTION, token)?;
            if created.status == 201 {
                Ok(RepoProvisioning::Created)
            } else {
                Err(TcacheError::Api {
                    status: created.status,
                    body: created.body,
                })
            }
        }
        status => Err(TcacheError::Api {
            status,
            body: lookup.body,
        }),
    }
}
