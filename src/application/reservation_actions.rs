//! Buyer actions on views that have no lifecycle of their own.

use std::sync::Arc;

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::CustomOfflinePayment;
use crate::ports::{ClientError, ReservationClient};

/// Handler for the success and offline-payment views.
pub struct ReservationActions {
    client: Arc<dyn ReservationClient>,
}

impl ReservationActions {
    pub fn new(client: Arc<dyn ReservationClient>) -> Self {
        Self { client }
    }

    /// Ask the backend to send the confirmation email again.
    pub async fn resend_confirmation_email(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<bool, ClientError> {
        let sent = self.client.resend_reservation_email(reservation_id).await?;
        if sent {
            tracing::info!(reservation_id = %reservation_id, "Confirmation email re-sent");
        } else {
            tracing::warn!(reservation_id = %reservation_id, "Backend declined to re-send confirmation email");
        }
        Ok(sent)
    }

    /// Instructions for the custom offline method the buyer chose, if any.
    ///
    /// A 404 means a built-in offline method was chosen.
    pub async fn offline_payment_details(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Option<CustomOfflinePayment>, ClientError> {
        match self
            .client
            .get_selected_offline_payment_details(reservation_id)
            .await
        {
            Ok(details) => Ok(Some(details)),
            Err(ClientError::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
