mod checkout;
mod helpers;
mod ledger;
mod mocks;
mod settle;
mod webhook;
