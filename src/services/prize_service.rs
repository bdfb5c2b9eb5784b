use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::external::RaffleStore;
use crate::models::{CreatePrizeRequest, Prize, UpdatePrizeRequest};
use crate::services::SessionCache;

/// Prize CRUD. A prize that has been drawn (`sorteado`) is immutable until
/// its winner record is removed.
pub struct PrizeService<S> {
    store: Arc<S>,
    cache: Arc<SessionCache>,
}

impl<S> Clone for PrizeService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
        }
    }
}

fn validate_range(name: &str, range_start: i64, range_end: i64) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "El nombre del premio es requerido".into(),
        ));
    }
    if range_start < 1 {
        return Err(AppError::ValidationError(
            "El inicio del rango debe ser mayor que cero".into(),
        ));
    }
    if range_start > range_end {
        return Err(AppError::ValidationError(
            "El inicio del rango no puede ser mayor que el final".into(),
        ));
    }
    Ok(())
}

impl<S: RaffleStore> PrizeService<S> {
    pub fn new(store: Arc<S>, cache: Arc<SessionCache>) -> Self {
        Self { store, cache }
    }

    pub async fn list(&self) -> Vec<Prize> {
        self.cache.prizes().await
    }

    async fn reload(&self) -> AppResult<()> {
        let prizes = self.store.list_prizes().await?;
        self.cache.set_prizes(prizes).await;
        Ok(())
    }

    pub async fn create(&self, request: CreatePrizeRequest) -> AppResult<()> {
        validate_range(&request.name, request.range_start, request.range_end)?;
        self.store.create_prize(&request).await?;
        self.reload().await
    }

    /// Bulk import of pre-parsed rows; returns the number of prizes created.
    pub async fn bulk_import(&self, rows: Vec<CreatePrizeRequest>) -> AppResult<usize> {
        if rows.is_empty() {
            return Err(AppError::ValidationError(
                "No hay premios válidos para importar".into(),
            ));
        }
        for row in &rows {
            validate_range(&row.name, row.range_start, row.range_end)?;
        }
        let created = self.store.bulk_create_prizes(&rows).await?;
        let count = created.len();
        self.cache.append_prizes(created).await;
        Ok(count)
    }

    pub async fn update(&self, request: UpdatePrizeRequest) -> AppResult<()> {
        let current = self
            .cache
            .find_prize(request.id_prize)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Premio {} no encontrado", request.id_prize)))?;

        if current.sorteado {
            return Err(AppError::PrizeAlreadyDrawn(current.name));
        }

        // Validate the merged record, not just the changed fields
        let name = request.name.as_deref().unwrap_or(&current.name);
        let range_start = request.range_start.unwrap_or(current.range_start);
        let range_end = request.range_end.unwrap_or(current.range_end);
        validate_range(name, range_start, range_end)?;

        self.store.update_prize(&request).await?;
        self.reload().await
    }

    pub async fn delete(&self, id_prize: i64) -> AppResult<()> {
        let prize = self
            .cache
            .find_prize(id_prize)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Premio {id_prize} no encontrado")))?;

        if prize.sorteado {
            return Err(AppError::PrizeAlreadyDrawn(prize.name));
        }

        self.store.delete_prize(id_prize).await?;
        self.cache.remove_prize(id_prize).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::memory::MemoryStore;

    async fn setup() -> (PrizeService<MemoryStore>, Arc<SessionCache>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(SessionCache::new());
        let service = PrizeService::new(store.clone(), cache.clone());
        (service, cache, store)
    }

    fn request(name: &str, range_start: i64, range_end: i64) -> CreatePrizeRequest {
        CreatePrizeRequest {
            name: name.to_string(),
            range_start,
            range_end,
        }
    }

    #[tokio::test]
    async fn test_create_and_reload() {
        let (service, cache, store) = setup().await;
        service.create(request("Cena para dos", 1, 10)).await.unwrap();
        assert_eq!(store.stored_prizes().len(), 1);
        assert_eq!(cache.prizes().await.len(), 1);
        assert!(!cache.prizes().await[0].sorteado);
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let (service, _, store) = setup().await;
        let result = service.create(request("Cena para dos", 10, 1)).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(store.stored_prizes().is_empty());
    }

    #[tokio::test]
    async fn test_single_number_range_allowed() {
        let (service, cache, _) = setup().await;
        service.create(request("Premio mayor", 7, 7)).await.unwrap();
        assert_eq!(cache.prizes().await[0].range_start, 7);
        assert_eq!(cache.prizes().await[0].range_end, 7);
    }

    #[tokio::test]
    async fn test_drawn_prize_is_immutable() {
        let (service, cache, store) = setup().await;
        let prize = store.seed_prize("Cena para dos", 1, 10);
        store
            .update_prize(&UpdatePrizeRequest {
                id_prize: prize.id_prize,
                name: None,
                range_start: None,
                range_end: None,
                sorteado: Some(true),
            })
            .await
            .unwrap();
        cache.warm(store.as_ref()).await.unwrap();

        let update = service
            .update(UpdatePrizeRequest {
                id_prize: prize.id_prize,
                name: Some("Otro nombre".into()),
                range_start: None,
                range_end: None,
                sorteado: None,
            })
            .await;
        assert!(matches!(update, Err(AppError::PrizeAlreadyDrawn(_))));

        let delete = service.delete(prize.id_prize).await;
        assert!(matches!(delete, Err(AppError::PrizeAlreadyDrawn(_))));
        assert_eq!(store.stored_prizes().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_import_appends_to_cache() {
        let (service, cache, _) = setup().await;
        let count = service
            .bulk_import(vec![
                request("Cena para dos", 1, 10),
                request("Botella de vino", 11, 20),
            ])
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(cache.prizes().await.len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_import_rejects_invalid_row() {
        let (service, _, store) = setup().await;
        let result = service
            .bulk_import(vec![request("Cena para dos", 1, 10), request("", 1, 5)])
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        // Nothing partial reaches the store
        assert!(store.stored_prizes().is_empty());
    }
}
