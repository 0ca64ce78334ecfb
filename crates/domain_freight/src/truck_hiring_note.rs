//! Truck hiring notes
//!
//! A truck hiring note (THN) engages a third-party truck owner for a trip:
//! hire charges, an advance paid at booking, and the balance settled
//! through the payment ledger after delivery. The transporter's details
//! are snapshotted onto the note at issue time.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, TransporterId, TruckHiringNoteId};
use domain_ledger::{ChargeBreakdown, LedgerFields};

use crate::error::FreightError;
use crate::party::TransporterSnapshot;
use crate::validation::{require_non_empty, validate_truck_number};

/// How the balance will be settled, as agreed on the note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerms {
    Cash,
    Cheque,
    #[serde(rename = "NEFT")]
    Neft,
    #[serde(rename = "UPI")]
    Upi,
}

/// The hire charge components on a truck hiring note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThnCharges {
    pub freight: Money,
    pub fuel: Money,
    pub toll: Money,
    pub other: Money,
}

impl ThnCharges {
    /// Freight-only charges, the rest zero
    pub fn freight_only(freight: Money) -> Self {
        let zero = Money::zero(freight.currency());
        Self {
            freight,
            fuel: zero,
            toll: zero,
            other: zero,
        }
    }

    /// The charges as named component lines, in form order
    pub fn breakdown(&self) -> ChargeBreakdown {
        ChargeBreakdown::new(self.freight.currency())
            .line("freight", self.freight)
            .line("fuelCharges", self.fuel)
            .line("tollCharges", self.toll)
            .line("otherCharges", self.other)
    }
}

/// A truck hiring note document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckHiringNote {
    /// Unique identifier
    pub id: TruckHiringNoteId,
    /// Allocated document number
    pub thn_number: i64,
    /// Issue date
    pub date: NaiveDate,
    /// Transporter record, when hired from the registered list
    pub transporter_id: Option<TransporterId>,
    /// Transporter details as issued
    pub transporter: TransporterSnapshot,
    /// Registration number of the hired truck
    pub truck_number: String,
    pub origin: String,
    pub destination: String,
    pub goods_type: String,
    /// Load weight in tonnes
    pub weight: Decimal,
    pub loading_date: Option<NaiveDate>,
    pub expected_delivery_date: NaiveDate,
    pub unloading_date: Option<NaiveDate>,
    /// Storage keys of proof-of-delivery images
    pub pod_image_keys: Vec<String>,
    /// Hire charge components
    pub charges: ThnCharges,
    /// Paid to the transporter at booking
    pub advance_paid: Money,
    /// Derived settlement fields, written only by the reconciler
    pub ledger: LedgerFields,
    pub payment_terms: Option<PaymentTerms>,
    pub payment_reference: Option<String>,
    pub special_instructions: Option<String>,
    /// Drafts are excluded from settlement reminders
    pub is_draft: bool,
    /// When the transporter was last chased for the balance
    pub last_reminder_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TruckHiringNote {
    /// Starts building a note with the required trip fields
    pub fn builder(
        thn_number: i64,
        date: NaiveDate,
        transporter: TransporterSnapshot,
        truck_number: impl Into<String>,
        expected_delivery_date: NaiveDate,
    ) -> TruckHiringNoteBuilder {
        TruckHiringNoteBuilder::new(thn_number, date, transporter, truck_number, expected_delivery_date)
    }

    /// Re-runs the construction validations, for use after editing fields
    /// in place
    ///
    /// # Errors
    ///
    /// Same as [`TruckHiringNoteBuilder::build`]: malformed truck number,
    /// blank trip fields, or a delivery date not strictly after loading.
    pub fn validate(&self) -> Result<(), FreightError> {
        validate_truck_number(&self.truck_number)?;
        require_non_empty(&self.origin, "origin")?;
        require_non_empty(&self.destination, "destination")?;
        require_non_empty(&self.goods_type, "goodsType")?;

        if let Some(loading) = self.loading_date {
            if self.expected_delivery_date <= loading {
                return Err(FreightError::DeliveryNotAfterLoading {
                    loading,
                    expected_delivery: self.expected_delivery_date,
                });
            }
        }
        Ok(())
    }

    /// Records that a settlement reminder was sent
    pub fn mark_reminded(&mut self, date: NaiveDate) {
        self.last_reminder_date = Some(date);
        self.updated_at = Utc::now();
    }

    /// Attaches a proof-of-delivery image key
    pub fn attach_pod(&mut self, key: impl Into<String>) {
        self.pod_image_keys.push(key.into());
        self.updated_at = Utc::now();
    }
}

/// Builder validating a truck hiring note at construction
pub struct TruckHiringNoteBuilder {
    thn_number: i64,
    date: NaiveDate,
    transporter_id: Option<TransporterId>,
    transporter: TransporterSnapshot,
    truck_number: String,
    origin: String,
    destination: String,
    goods_type: String,
    weight: Decimal,
    loading_date: Option<NaiveDate>,
    expected_delivery_date: NaiveDate,
    charges: Option<ThnCharges>,
    advance_paid: Option<Money>,
    payment_terms: Option<PaymentTerms>,
    payment_reference: Option<String>,
    special_instructions: Option<String>,
    is_draft: bool,
}

impl TruckHiringNoteBuilder {
    fn new(
        thn_number: i64,
        date: NaiveDate,
        transporter: TransporterSnapshot,
        truck_number: impl Into<String>,
        expected_delivery_date: NaiveDate,
    ) -> Self {
        Self {
            thn_number,
            date,
            transporter_id: None,
            transporter,
            truck_number: truck_number.into(),
            origin: String::new(),
            destination: String::new(),
            goods_type: String::new(),
            weight: Decimal::ZERO,
            loading_date: None,
            expected_delivery_date,
            charges: None,
            advance_paid: None,
            payment_terms: None,
            payment_reference: None,
            special_instructions: None,
            is_draft: false,
        }
    }

    /// Links the registered transporter record
    pub fn transporter_id(mut self, id: TransporterId) -> Self {
        self.transporter_id = Some(id);
        self
    }

    /// Sets origin and destination
    pub fn route(mut self, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        self.origin = origin.into();
        self.destination = destination.into();
        self
    }

    /// Sets the goods description and load weight in tonnes
    pub fn goods(mut self, goods_type: impl Into<String>, weight: Decimal) -> Self {
        self.goods_type = goods_type.into();
        self.weight = weight;
        self
    }

    /// Sets the loading date
    pub fn loading_date(mut self, date: NaiveDate) -> Self {
        self.loading_date = Some(date);
        self
    }

    /// Sets the hire charges
    pub fn charges(mut self, charges: ThnCharges) -> Self {
        self.charges = Some(charges);
        self
    }

    /// Sets the advance paid at booking
    pub fn advance_paid(mut self, advance: Money) -> Self {
        self.advance_paid = Some(advance);
        self
    }

    /// Sets the agreed payment terms
    pub fn payment_terms(mut self, terms: PaymentTerms) -> Self {
        self.payment_terms = Some(terms);
        self
    }

    /// Sets the payment reference (cheque number, UTR)
    pub fn payment_reference(mut self, reference: impl Into<String>) -> Self {
        self.payment_reference = Some(reference.into());
        self
    }

    /// Sets driver/trip instructions
    pub fn special_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }

    /// Marks the note as a draft
    pub fn draft(mut self) -> Self {
        self.is_draft = true;
        self
    }

    /// Validates and builds the note
    ///
    /// Derives the ledger fields from the charges and advance (settled
    /// starts at zero).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTruckNumber` for a malformed registration,
    /// `DeliveryNotAfterLoading` when the expected delivery does not fall
    /// strictly after the loading date, `MissingField` for blank required
    /// trip fields, and ledger errors for negative charges or an advance
    /// above the total.
    pub fn build(self) -> Result<TruckHiringNote, FreightError> {
        let charges = self
            .charges
            .unwrap_or_else(|| ThnCharges::freight_only(Money::zero(Currency::INR)));
        let currency = charges.freight.currency();
        let advance_paid = self.advance_paid.unwrap_or_else(|| Money::zero(currency));

        let now = Utc::now();
        let mut note = TruckHiringNote {
            id: TruckHiringNoteId::new_v7(),
            thn_number: self.thn_number,
            date: self.date,
            transporter_id: self.transporter_id,
            transporter: self.transporter,
            truck_number: self.truck_number,
            origin: self.origin,
            destination: self.destination,
            goods_type: self.goods_type,
            weight: self.weight,
            loading_date: self.loading_date,
            expected_delivery_date: self.expected_delivery_date,
            unloading_date: None,
            pod_image_keys: Vec::new(),
            charges,
            advance_paid,
            ledger: LedgerFields::unpaid(currency),
            payment_terms: self.payment_terms,
            payment_reference: self.payment_reference,
            special_instructions: self.special_instructions,
            is_draft: self.is_draft,
            last_reminder_date: None,
            created_at: now,
            updated_at: now,
        };
        note.validate()?;
        note.ledger =
            LedgerFields::derive(&note.charges.breakdown(), note.advance_paid, Money::zero(currency))?;
        Ok(note)
    }
}
