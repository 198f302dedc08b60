//! Hand-rolled mocks for the endpoint tests. The gateway mock mirrors Stripe's check-then-act settlement
//! surface; the ledger mock is a plain in-memory table.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use settlement_engine::{
    commission::calculate_split,
    db_types::{
        LedgerEntry,
        NewLedgerEntry,
        NewPromoCode,
        NewQrCode,
        PayoutStatus,
        PromoCode,
        QrCode,
        TransferRole,
    },
    traits::{
        GatewayError,
        LedgerDatabase,
        LedgerError,
        LedgerManagement,
        NewPaymentRequest,
        PaymentGateway,
        PaymentRecord,
        PaymentStatus,
        SplitMetadata,
        TransferRecord,
        TransferRequest,
    },
};
use wsp_common::Cents;

//--------------------------------------     MockGateway     ---------------------------------------------------------
#[derive(Default)]
pub struct GatewayState {
    pub payments: HashMap<String, PaymentRecord>,
    pub transfers: Vec<TransferRecord>,
    pub transfer_attempts: usize,
    pub fail_provider: bool,
}

#[derive(Clone, Default)]
pub struct MockGateway {
    pub state: Arc<Mutex<GatewayState>>,
}

impl MockGateway {
    /// Seeds a succeeded payment with a valid split in its metadata, as checkout would have created it.
    pub fn with_succeeded_payment(id: &str, gross: i64, host: bool) -> Self {
        let gateway = Self::default();
        let split = calculate_split(Cents::from(gross), host).unwrap();
        let meta = SplitMetadata {
            provider_account: "acct_prov".to_string(),
            host_account: host.then(|| "acct_host".to_string()),
            provider_amount: split.provider,
            host_amount: split.host,
            description: "Sunset kayak tour".to_string(),
        };
        let payment = PaymentRecord {
            id: id.to_string(),
            amount: Cents::from(gross),
            currency: "usd".to_string(),
            status: PaymentStatus::Succeeded,
            client_token: None,
            metadata: meta.to_map(),
        };
        gateway.state.lock().unwrap().payments.insert(id.to_string(), payment);
        gateway
    }

    pub fn fail_provider(self) -> Self {
        self.state.lock().unwrap().fail_provider = true;
        self
    }

    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.state.lock().unwrap().transfers.clone()
    }

    pub fn transfer_attempts(&self) -> usize {
        self.state.lock().unwrap().transfer_attempts
    }
}

impl PaymentGateway for MockGateway {
    async fn create_payment(&self, request: NewPaymentRequest) -> Result<PaymentRecord, GatewayError> {
        let mut state = self.state.lock().unwrap();
        let id = format!("pi_{}", state.payments.len() + 1);
        let payment = PaymentRecord {
            id: id.clone(),
            amount: request.amount,
            currency: request.currency,
            status: PaymentStatus::Pending,
            client_token: Some("tok_secret".to_string()),
            metadata: request.metadata,
        };
        state.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, GatewayError> {
        let state = self.state.lock().unwrap();
        state.payments.get(payment_id).cloned().ok_or_else(|| GatewayError::PaymentNotFound(payment_id.to_string()))
    }

    async fn create_transfer(&self, request: TransferRequest) -> Result<TransferRecord, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.transfer_attempts += 1;
        if request.role == TransferRole::Provider && state.fail_provider {
            return Err(GatewayError::Rejected("provider leg rejected".to_string()));
        }
        let record = TransferRecord {
            id: format!("tr_{}", state.transfers.len() + 1),
            amount: request.amount,
            currency: request.currency,
            destination: request.destination,
            group_key: request.group_key,
            role: Some(request.role),
        };
        state.transfers.push(record.clone());
        Ok(record)
    }

    async fn transfers_for_group(&self, group_key: &str) -> Result<Vec<TransferRecord>, GatewayError> {
        let state = self.state.lock().unwrap();
        Ok(state.transfers.iter().filter(|t| t.group_key == group_key).cloned().collect())
    }

    fn minimum_charge(&self) -> Cents {
        Cents::from(50)
    }
}

//--------------------------------------      MockLedger     ---------------------------------------------------------
#[derive(Default)]
pub struct LedgerState {
    pub entries: Vec<LedgerEntry>,
    pub promo_codes: Vec<PromoCode>,
    pub qr_codes: Vec<QrCode>,
}

#[derive(Clone, Default)]
pub struct MockLedger {
    pub state: Arc<Mutex<LedgerState>>,
}

impl MockLedger {
    pub fn with_entry(self, entry: LedgerEntry) -> Self {
        self.state.lock().unwrap().entries.push(entry);
        self
    }
}

/// A ledger row for a completed sale of `gross`, credited to `host_id` when one referred the sale.
pub fn ledger_entry(id: i64, tx_id: &str, host_id: Option<&str>, gross: i64) -> LedgerEntry {
    let split = calculate_split(Cents::from(gross), host_id.is_some()).unwrap();
    let now = Utc::now();
    LedgerEntry {
        id,
        tx_id: tx_id.to_string(),
        provider_id: "prov_1".to_string(),
        host_id: host_id.map(String::from),
        promo_code: host_id.map(|_| "SUMMER".to_string()),
        qr_code: None,
        gross: split.total,
        platform_amount: split.platform,
        provider_amount: split.provider,
        host_amount: split.host,
        currency: "usd".to_string(),
        payout_status: PayoutStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

impl LedgerDatabase for MockLedger {
    fn url(&self) -> &str {
        "sqlite://in-memory"
    }

    async fn apply_completed_transaction(&self, entry: NewLedgerEntry) -> Result<bool, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.entries.iter().any(|e| e.tx_id == entry.tx_id) {
            return Ok(false);
        }
        let now = Utc::now();
        let row = LedgerEntry {
            id: state.entries.len() as i64 + 1,
            tx_id: entry.tx_id,
            provider_id: entry.provider_id,
            host_id: None,
            promo_code: entry.promo_code,
            qr_code: entry.qr_code,
            gross: entry.gross,
            platform_amount: entry.platform_amount,
            provider_amount: entry.provider_amount,
            host_amount: entry.host_amount,
            currency: entry.currency,
            payout_status: PayoutStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.entries.push(row);
        Ok(true)
    }

    async fn insert_promo_code(&self, code: NewPromoCode) -> Result<PromoCode, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.promo_codes.iter().any(|p| p.code == code.code) {
            return Err(LedgerError::CodeAlreadyExists(code.code));
        }
        let now = Utc::now();
        let promo = PromoCode {
            id: state.promo_codes.len() as i64 + 1,
            code: code.code,
            host_id: code.host_id,
            usage_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.promo_codes.push(promo.clone());
        Ok(promo)
    }

    async fn insert_qr_code(&self, code: NewQrCode) -> Result<QrCode, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.qr_codes.iter().any(|q| q.code == code.code) {
            return Err(LedgerError::CodeAlreadyExists(code.code));
        }
        let now = Utc::now();
        let qr = QrCode {
            id: state.qr_codes.len() as i64 + 1,
            code: code.code,
            host_id: code.host_id,
            conversion_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.qr_codes.push(qr.clone());
        Ok(qr)
    }

    async fn mark_paid(&self, tx_id: &str) -> Result<LedgerEntry, LedgerError> {
        let mut state = self.state.lock().unwrap();
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.tx_id == tx_id)
            .ok_or_else(|| LedgerError::EntryNotFound(tx_id.to_string()))?;
        if entry.payout_status == PayoutStatus::Paid {
            return Err(LedgerError::AlreadyPaid(tx_id.to_string()));
        }
        entry.payout_status = PayoutStatus::Paid;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}

impl LedgerManagement for MockLedger {
    async fn fetch_ledger_entry(&self, tx_id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state.entries.iter().find(|e| e.tx_id == tx_id).cloned())
    }

    async fn fetch_entries_for_host(&self, host_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state.entries.iter().filter(|e| e.host_id.as_deref() == Some(host_id)).cloned().collect())
    }

    async fn host_commission_total(&self, host_id: &str) -> Result<Cents, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state.entries.iter().filter(|e| e.host_id.as_deref() == Some(host_id)).map(|e| e.host_amount).sum())
    }

    async fn fetch_promo_code(&self, code: &str) -> Result<Option<PromoCode>, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state.promo_codes.iter().find(|p| p.code == code).cloned())
    }

    async fn fetch_qr_code(&self, code: &str) -> Result<Option<QrCode>, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state.qr_codes.iter().find(|q| q.code == code).cloned())
    }
}
