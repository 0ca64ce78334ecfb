//! Invoice handlers

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::{CustomerId, InvoiceId, LorryReceiptId, Money, Rate};
use domain_freight::{Invoice, LorryReceiptStatus};
use domain_ledger::{DocumentRef, LedgerFields};
use domain_numbering::SequenceKey;
use infra_db::{InvoiceRepository, LorryReceiptRepository};

use crate::dto::invoice::{CreateInvoiceRequest, InvoiceResponse, UpdateInvoiceRequest};
use crate::dto::{parse_currency, Pagination};
use crate::error::ApiError;
use crate::AppState;

/// Creates an invoice covering the given lorry receipts
///
/// Allocates the invoice number, sums the receipts' freight, applies GST,
/// derives the settlement fields, and marks the receipts Invoiced.
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let currency = parse_currency(&request.currency)?;
    let receipt_repo = LorryReceiptRepository::new(state.pool.clone());

    let mut receipts = Vec::with_capacity(request.lorry_receipt_ids.len());
    for id in &request.lorry_receipt_ids {
        let id = LorryReceiptId::from(*id);
        let receipt = receipt_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("lorry receipt {id} not found")))?;
        receipts.push(receipt);
    }

    let invoice_number = state.allocator.allocate(SequenceKey::Invoice).await?;
    let mut invoice = Invoice::new(
        invoice_number,
        request.date,
        CustomerId::from(request.customer_id),
        currency,
    );
    if let Some(gst_type) = request.gst_type {
        invoice.gst_type = gst_type;
    }
    if let Some(rate) = request.cgst_rate {
        invoice.cgst_rate = Rate::from_percentage(rate);
    }
    if let Some(rate) = request.sgst_rate {
        invoice.sgst_rate = Rate::from_percentage(rate);
    }
    if let Some(rate) = request.igst_rate {
        invoice.igst_rate = Rate::from_percentage(rate);
    }
    invoice.is_rcm = request.is_rcm;
    invoice.is_manual_gst = request.is_manual_gst;
    if request.is_manual_gst {
        if let Some(amount) = request.cgst_amount {
            invoice.cgst_amount = Money::new(amount, currency);
        }
        if let Some(amount) = request.sgst_amount {
            invoice.sgst_amount = Money::new(amount, currency);
        }
        if let Some(amount) = request.igst_amount {
            invoice.igst_amount = Money::new(amount, currency);
        }
    }
    invoice.remarks = request.remarks;

    invoice.cover_lorry_receipts(&receipts)?;
    invoice.ledger = LedgerFields::derive(
        &invoice.charge_breakdown(),
        Money::zero(currency),
        Money::zero(currency),
    )?;

    InvoiceRepository::new(state.pool.clone()).insert(&invoice).await?;

    for mut receipt in receipts {
        receipt.transition_to(LorryReceiptStatus::Invoiced)?;
        receipt_repo.update(&receipt).await?;
    }

    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// Edits an invoice's billing fields, optionally replacing the covered
/// receipt set
///
/// The settlement fields are re-derived against the live payment ledger
/// through the reconciler's conditional commit, so a payment recorded
/// while the edit was in flight is never rolled back.
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let repo = InvoiceRepository::new(state.pool.clone());
    let receipt_repo = LorryReceiptRepository::new(state.pool.clone());
    let id = InvoiceId::from(id);
    let mut invoice = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("invoice {id} not found")))?;
    let currency = invoice.total_amount.currency();

    if let Some(date) = request.date {
        invoice.date = date;
    }
    if let Some(gst_type) = request.gst_type {
        invoice.gst_type = gst_type;
    }
    if let Some(rate) = request.cgst_rate {
        invoice.cgst_rate = Rate::from_percentage(rate);
    }
    if let Some(rate) = request.sgst_rate {
        invoice.sgst_rate = Rate::from_percentage(rate);
    }
    if let Some(rate) = request.igst_rate {
        invoice.igst_rate = Rate::from_percentage(rate);
    }
    if let Some(is_rcm) = request.is_rcm {
        invoice.is_rcm = is_rcm;
    }
    if let Some(is_manual_gst) = request.is_manual_gst {
        invoice.is_manual_gst = is_manual_gst;
    }
    if invoice.is_manual_gst {
        if let Some(amount) = request.cgst_amount {
            invoice.cgst_amount = Money::new(amount, currency);
        }
        if let Some(amount) = request.sgst_amount {
            invoice.sgst_amount = Money::new(amount, currency);
        }
        if let Some(amount) = request.igst_amount {
            invoice.igst_amount = Money::new(amount, currency);
        }
    }
    if let Some(remarks) = request.remarks {
        invoice.remarks = Some(remarks);
    }

    match &request.lorry_receipt_ids {
        Some(ids) => {
            let mut receipts = Vec::with_capacity(ids.len());
            for receipt_id in ids {
                let receipt_id = LorryReceiptId::from(*receipt_id);
                let receipt = receipt_repo.find_by_id(receipt_id).await?.ok_or_else(|| {
                    ApiError::NotFound(format!("lorry receipt {receipt_id} not found"))
                })?;
                receipts.push(receipt);
            }
            let covered: HashSet<LorryReceiptId> = receipts.iter().map(|r| r.id).collect();
            let previous = invoice.lorry_receipt_ids.clone();

            invoice.cover_lorry_receipts(&receipts)?;

            for receipt_id in previous {
                if covered.contains(&receipt_id) {
                    continue;
                }
                if let Some(mut receipt) = receipt_repo.find_by_id(receipt_id).await? {
                    receipt.release_from_invoice()?;
                    receipt_repo.update(&receipt).await?;
                }
            }
            for mut receipt in receipts {
                if receipt.status.can_transition_to(LorryReceiptStatus::Invoiced) {
                    receipt.transition_to(LorryReceiptStatus::Invoiced)?;
                    receipt_repo.update(&receipt).await?;
                }
            }
        }
        None => invoice.compute_gst()?,
    }

    invoice.ledger = state
        .reconciler
        .on_document_edit(
            DocumentRef::Invoice(invoice.id),
            &invoice.charge_breakdown(),
            Money::zero(currency),
        )
        .await?;
    repo.update(&invoice).await?;
    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// Deletes an invoice, releasing its receipts for re-billing
///
/// Payments recorded against the invoice are unlinked, not deleted; they
/// remain on the customer's ledger as general receipts.
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = InvoiceRepository::new(state.pool.clone());
    let receipt_repo = LorryReceiptRepository::new(state.pool.clone());
    let id = InvoiceId::from(id);
    let invoice = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("invoice {id} not found")))?;

    repo.delete(id).await?;

    for receipt_id in invoice.lorry_receipt_ids {
        if let Some(mut receipt) = receipt_repo.find_by_id(receipt_id).await? {
            if receipt.status == LorryReceiptStatus::Invoiced {
                receipt.release_from_invoice()?;
                receipt_repo.update(&receipt).await?;
            }
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<InvoiceResponse>>, ApiError> {
    let invoices = InvoiceRepository::new(state.pool.clone())
        .list(page.limit(), page.offset())
        .await?;
    Ok(Json(invoices.iter().map(InvoiceResponse::from).collect()))
}

/// Gets an invoice by ID
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let id = InvoiceId::from(id);
    let invoice = InvoiceRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("invoice {id} not found")))?;
    Ok(Json(InvoiceResponse::from(&invoice)))
}
