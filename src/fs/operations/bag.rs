//! Bag-level operations: delete and add by id.

use reqwest::Method;
use tracing::info;

use crate::api::client::{endpoints, validate_bag_id};
use crate::api::response::expect_success;
use crate::error::Result;
use crate::session::Session;

impl Session {
    /// Remove a bag from the account.
    pub(crate) async fn delete_bag(&self, bag_id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, endpoints::BAG)?;
        let bag_id = validate_bag_id(bag_id)?;

        let response = self.send(request.form(&[("bag_id", bag_id)])).await?;
        expect_success(response).await?;

        info!(bag_id = %bag_id, "Bag deleted");
        Ok(())
    }

    /// Register an existing bag with the account.
    pub(crate) async fn add_bag(&self, bag_id: &str) -> Result<()> {
        let request = self.request(Method::POST, endpoints::BAG_ADD)?;
        let bag_id = validate_bag_id(bag_id)?;

        let response = self.send(request.form(&[("bag_id", bag_id)])).await?;
        expect_success(response).await?;

        info!(bag_id = %bag_id, "Bag added");
        Ok(())
    }
}
