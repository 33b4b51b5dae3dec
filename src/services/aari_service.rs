// src/services/aari_service.rs

use std::sync::Arc;

use futures::future::join_all;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Pagination},
    db::AariStore,
    models::aari::{
        AariOrderView, ClientPricePayload, ClientPriceSelector, CompletedAariSummary,
        DesignUpload, PendingAariSummary, SubmitAariForm, WorkerPricePayload, MAX_DESIGNS,
        MAX_DESIGN_BYTES,
    },
    storage::{design_object_key, ObjectStorage},
};

#[derive(Clone)]
pub struct AariService {
    store: Arc<dyn AariStore>,
    storage: Arc<dyn ObjectStorage>,
}

/// Regras dos arquivos: quantidade, tipo e tamanho. Checadas antes de qualquer upload.
pub fn check_designs(designs: &[DesignUpload]) -> Result<(), AppError> {
    if designs.is_empty() {
        return Err(AppError::InvalidInput("At least one design file is required".into()));
    }
    if designs.len() > MAX_DESIGNS {
        return Err(AppError::InvalidInput(format!(
            "A maximum of {MAX_DESIGNS} design files is allowed"
        )));
    }
    for design in designs {
        if !design.has_allowed_type() {
            return Err(AppError::InvalidInput(format!(
                "Only JPG, JPEG, and PNG images are allowed ({})",
                design.file_name
            )));
        }
        if design.bytes.len() >= MAX_DESIGN_BYTES {
            return Err(AppError::InvalidInput(format!(
                "Design file {} exceeds the 20 MB limit",
                design.file_name
            )));
        }
    }
    Ok(())
}

impl AariService {
    pub fn new(store: Arc<dyn AariStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { store, storage }
    }

    // =========================================================================
    //  ENVIO
    // =========================================================================

    /// Valida, sobe todos os designs em paralelo e só então grava o pedido.
    /// Retorna o `orderId` gravado.
    pub async fn submit_order(
        &self,
        form: SubmitAariForm,
        designs: Vec<DesignUpload>,
    ) -> Result<String, AppError> {
        form.validate()?;
        check_designs(&designs)?;
        let order = form.into_new_order()?;

        let uploads = designs.into_iter().map(|design| {
            let storage = &self.storage;
            async move {
                let key = design_object_key(&design);
                let result = storage
                    .put_object(&key, design.bytes, &design.content_type)
                    .await;
                (key, result)
            }
        });

        // join_all mantém a ordem de entrada: designs[i] é o i-ésimo arquivo enviado.
        let mut urls = Vec::with_capacity(MAX_DESIGNS);
        let mut uploaded_keys = Vec::with_capacity(MAX_DESIGNS);
        let mut failure = None;
        for (key, result) in join_all(uploads).await {
            match result {
                Ok(url) => {
                    uploaded_keys.push(key);
                    urls.push(url);
                }
                Err(e) => {
                    tracing::error!(order_id = %order.order_id, key = %key, error = %e, "Falha no upload do design");
                    failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = failure {
            if !uploaded_keys.is_empty() {
                tracing::warn!(
                    order_id = %order.order_id,
                    orphaned = ?uploaded_keys,
                    "Envio abortado, designs já enviados ficaram órfãos no storage"
                );
            }
            return Err(e);
        }

        if let Err(e) = self.store.insert(&order, &urls).await {
            tracing::warn!(
                order_id = %order.order_id,
                orphaned = ?uploaded_keys,
                "Pedido não gravado, designs já enviados ficaram órfãos no storage"
            );
            return Err(e);
        }

        tracing::info!(
            order_id = %order.order_id,
            designs = urls.len(),
            "✅ Pedido Aari salvo"
        );
        Ok(order.order_id)
    }

    // =========================================================================
    //  LISTAGENS
    // =========================================================================

    pub async fn list_pending(&self, page: Pagination) -> Result<Vec<PendingAariSummary>, AppError> {
        self.store.list_pending(page).await
    }

    pub async fn list_completed(&self, page: Pagination) -> Result<Vec<CompletedAariSummary>, AppError> {
        self.store.list_completed(page).await
    }

    pub async fn get_design_urls(&self, order_id: &str) -> Result<Vec<String>, AppError> {
        let designs = self
            .store
            .find_designs(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

        if designs.is_empty() {
            return Err(AppError::NotFound("No design URLs found for this order".into()));
        }
        Ok(designs)
    }

    // =========================================================================
    //  CICLO DE VIDA
    // =========================================================================

    /// Exclusão definitiva. Uma segunda chamada com o mesmo id é `NotFound`.
    pub async fn delete_order(&self, order_id: &str) -> Result<(), AppError> {
        if !self.store.delete(order_id).await? {
            return Err(AppError::NotFound("Order not found".into()));
        }
        tracing::info!(order_id = %order_id, "Pedido Aari excluído");
        Ok(())
    }

    pub async fn mark_completed(
        &self,
        order_id: &str,
        payload: WorkerPricePayload,
    ) -> Result<AariOrderView, AppError> {
        payload.validate()?;
        let worker_price = payload
            .worker_price
            .ok_or_else(|| AppError::InvalidInput("Worker price is required".into()))?;

        let order = self
            .store
            .mark_completed(order_id, worker_price)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

        tracing::info!(order_id = %order_id, worker_price = %worker_price, "Pedido Aari concluído");
        Ok(order.into())
    }

    pub async fn set_client_price(
        &self,
        selector: ClientPriceSelector,
        payload: ClientPricePayload,
    ) -> Result<AariOrderView, AppError> {
        payload.validate()?;
        let client_price = payload
            .client_price
            .ok_or_else(|| AppError::InvalidInput("Client price is required".into()))?;

        let order = self
            .store
            .set_client_price(&selector, client_price)
            .await?
            .ok_or_else(|| match &selector {
                ClientPriceSelector::OrderId(_) => AppError::NotFound("Order not found".into()),
                ClientPriceSelector::PhoneNumber(_) => {
                    AppError::NotFound("No order found for this phone number".into())
                }
            })?;

        tracing::info!(order_id = %order.order_id, client_price = %client_price, "Preço do cliente atualizado");
        Ok(order.into())
    }
}
