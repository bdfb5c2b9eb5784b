use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePrizeRequest, CreateWinnerRequest, DeleteWinnerRequest, Participant, Prize,
    UpdateParticipantRequest, UpdatePrizeRequest, Winner,
};

/// Envelope every store endpoint answers with. `status_code == 200` is the
/// only success; anything else is treated uniformly as failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreResponse<T> {
    pub status_code: i32,
    pub data: Option<T>,
    pub detail: Option<String>,
}

/// Wire payload for registering a new participant with the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipant {
    pub name: String,
    pub cedula: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesa: Option<String>,
    pub active: bool,
}

/// The remote raffle data store. It owns participants, prizes and winners
/// authoritatively; this service only caches them. The trait seam exists so
/// the draw coordination logic can run against an in-memory double in tests.
pub trait RaffleStore: Send + Sync + 'static {
    fn list_participants(&self) -> impl Future<Output = AppResult<Vec<Participant>>> + Send;
    fn create_participant(
        &self,
        participant: &NewParticipant,
    ) -> impl Future<Output = AppResult<()>> + Send;
    fn bulk_create_participants(
        &self,
        participants: &[NewParticipant],
    ) -> impl Future<Output = AppResult<Vec<Participant>>> + Send;
    fn update_participant(
        &self,
        update: &UpdateParticipantRequest,
    ) -> impl Future<Output = AppResult<()>> + Send;
    fn delete_participant(&self, id_participant: i64)
    -> impl Future<Output = AppResult<()>> + Send;

    fn list_prizes(&self) -> impl Future<Output = AppResult<Vec<Prize>>> + Send;
    fn create_prize(
        &self,
        prize: &CreatePrizeRequest,
    ) -> impl Future<Output = AppResult<()>> + Send;
    fn bulk_create_prizes(
        &self,
        prizes: &[CreatePrizeRequest],
    ) -> impl Future<Output = AppResult<Vec<Prize>>> + Send;
    fn update_prize(
        &self,
        update: &UpdatePrizeRequest,
    ) -> impl Future<Output = AppResult<()>> + Send;
    fn delete_prize(&self, id_prize: i64) -> impl Future<Output = AppResult<()>> + Send;

    fn list_winners(&self) -> impl Future<Output = AppResult<Vec<Winner>>> + Send;
    fn create_winner(
        &self,
        winner: &CreateWinnerRequest,
    ) -> impl Future<Output = AppResult<Winner>> + Send;
    /// Exact-match delete: the store requires the full recorded tuple.
    fn delete_winner(
        &self,
        request: &DeleteWinnerRequest,
    ) -> impl Future<Output = AppResult<()>> + Send;
    fn delete_all_winners(&self) -> impl Future<Output = AppResult<()>> + Send;
    /// Destructive delete-everything: participants, prizes and winners.
    fn wipe_all(&self) -> impl Future<Output = AppResult<()>> + Send;
}

pub struct RaffleStoreClient {
    client: Client,
    base_url: String,
}

impl RaffleStoreClient {
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps a store envelope to a result, folding non-200 and missing-detail
    /// cases into `ExternalApiError`.
    fn unwrap_data<T>(context: &str, response: StoreResponse<T>) -> AppResult<T> {
        if response.status_code != 200 {
            return Err(AppError::ExternalApiError(format!(
                "{context} failed: status {}{}",
                response.status_code,
                response
                    .detail
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            )));
        }
        response
            .data
            .ok_or_else(|| AppError::ExternalApiError(format!("{context}: empty response data")))
    }

    fn check_ok<T>(context: &str, response: StoreResponse<T>) -> AppResult<()> {
        if response.status_code != 200 {
            return Err(AppError::ExternalApiError(format!(
                "{context} failed: status {}{}",
                response.status_code,
                response
                    .detail
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            )));
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<StoreResponse<T>> {
        let response = self.client.get(self.url(path)).send().await?;
        Ok(response.json().await?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<StoreResponse<T>> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Ok(response.json().await?)
    }

    async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<StoreResponse<serde_json::Value>> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Ok(response.json().await?)
    }

    async fn delete<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<StoreResponse<serde_json::Value>> {
        let mut request = self.client.delete(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Ok(response.json().await?)
    }
}

impl RaffleStore for RaffleStoreClient {
    async fn list_participants(&self) -> AppResult<Vec<Participant>> {
        let response = self.get("/participant").await?;
        Self::unwrap_data("list participants", response)
    }

    async fn create_participant(&self, participant: &NewParticipant) -> AppResult<()> {
        let response: StoreResponse<serde_json::Value> =
            self.post("/participant", participant).await?;
        Self::check_ok("create participant", response)
    }

    async fn bulk_create_participants(
        &self,
        participants: &[NewParticipant],
    ) -> AppResult<Vec<Participant>> {
        let body = serde_json::json!({ "participants": participants });
        let response = self.post("/participant/bulk", &body).await?;
        Self::unwrap_data("bulk create participants", response)
    }

    async fn update_participant(&self, update: &UpdateParticipantRequest) -> AppResult<()> {
        let response = self.put("/participant", update).await?;
        Self::check_ok("update participant", response)
    }

    async fn delete_participant(&self, id_participant: i64) -> AppResult<()> {
        let body = serde_json::json!({ "id_participant": id_participant });
        let response = self.delete("/participant", Some(&body)).await?;
        Self::check_ok("delete participant", response)
    }

    async fn list_prizes(&self) -> AppResult<Vec<Prize>> {
        let response = self.get("/prize").await?;
        Self::unwrap_data("list prizes", response)
    }

    async fn create_prize(&self, prize: &CreatePrizeRequest) -> AppResult<()> {
        let response: StoreResponse<serde_json::Value> = self.post("/prize", prize).await?;
        Self::check_ok("create prize", response)
    }

    async fn bulk_create_prizes(&self, prizes: &[CreatePrizeRequest]) -> AppResult<Vec<Prize>> {
        let body = serde_json::json!({ "prizes": prizes });
        let response = self.post("/prize/bulk", &body).await?;
        Self::unwrap_data("bulk create prizes", response)
    }

    async fn update_prize(&self, update: &UpdatePrizeRequest) -> AppResult<()> {
        let response = self.put("/prize", update).await?;
        Self::check_ok("update prize", response)
    }

    async fn delete_prize(&self, id_prize: i64) -> AppResult<()> {
        let body = serde_json::json!({ "id_prize": id_prize });
        let response = self.delete("/prize", Some(&body)).await?;
        Self::check_ok("delete prize", response)
    }

    async fn list_winners(&self) -> AppResult<Vec<Winner>> {
        let response = self.get("/winner").await?;
        Self::unwrap_data("list winners", response)
    }

    async fn create_winner(&self, winner: &CreateWinnerRequest) -> AppResult<Winner> {
        let response = self.post("/winner", winner).await?;
        Self::unwrap_data("create winner", response)
    }

    async fn delete_winner(&self, request: &DeleteWinnerRequest) -> AppResult<()> {
        let response = self.delete("/winner/filter", Some(request)).await?;
        Self::check_ok("delete winner", response)
    }

    async fn delete_all_winners(&self) -> AppResult<()> {
        let response = self.delete::<()>("/winner/full", None).await?;
        Self::check_ok("delete all winners", response)
    }

    async fn wipe_all(&self) -> AppResult<()> {
        let response = self.delete::<()>("/clean", None).await?;
        Self::check_ok("full data wipe", response)
    }
}
