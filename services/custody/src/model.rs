// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Request and response models of the custody api.
//!
//! Amounts are [`Decimal`], serialized as JSON strings and accepted as
//! either strings or numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Envelope of every custody api response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse<T> {
    /// `0` means success.
    #[serde(default)]
    pub code: i64,
    /// Error message, empty on success.
    #[serde(default)]
    pub message: String,
    /// Success flag, the api may send `null`.
    pub successful: Option<bool>,
    /// Payload, absent on most errors.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check whether the api reported success.
    pub fn is_success(&self) -> bool {
        self.code == 0 && self.successful.unwrap_or(true)
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    /// Total number of records.
    #[serde(default)]
    pub total: i64,
    /// Offset of this page.
    #[serde(default)]
    pub offset: i64,
    /// Page size.
    #[serde(default)]
    pub limit: i64,
    /// Records of this page.
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

/// Body of `POST /custody/v1/api/addresses/type/check`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckAddressRequest {
    pub addresses: Vec<String>,
    pub coin_name: String,
}

/// Body of `POST /custody/v1/api/projects/{b_id}/order/create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    pub from_wallet_code: String,
    pub coin_name: String,
    /// Caller chosen id, used for idempotency on the server side.
    pub order_no: String,
    pub dest_address_item_list: Vec<DestAddressItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_rate_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<f64>,
}

/// One destination of a withdrawal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DestAddressItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub dest_address: String,
    pub amount: Decimal,
    pub is_all_withdrawal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_transfer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_aggre: Option<bool>,
}

/// Data of a created order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateOrderData {
    pub order_no: String,
}

/// Query of `GET .../wallets/{wallet_code}/tx-summaries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TxSummaryQuery {
    /// Business line id, part of the path.
    #[serde(skip)]
    pub b_id: String,
    /// Wallet code, part of the path.
    #[serde(skip)]
    pub wallet_code: String,
    pub coin_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_joined")]
    pub tx_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_joined")]
    pub addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `0` newest first, `1` oldest first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time_order: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

/// One record of a wallet transaction summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TxSummary {
    pub wallet_code: String,
    pub chain: String,
    /// `MIXED_ADDRESS` or `SEGREGATED_ADDRESS`.
    pub wallet_type: String,
    pub coin_name: String,
    pub order_no: String,
    pub block_height: i64,
    pub tx_id: String,
    pub tx_type: String,
    pub amount: Decimal,
    pub wallet_balance: Decimal,
    pub remark_detail: String,
    pub tx_time_stamp: i64,
    pub create_time_stamp: i64,
}

/// Query of `GET .../wallets/{wallet_code}/tx-details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TxDetailsQuery {
    /// Business line id, part of the path.
    #[serde(skip)]
    pub b_id: String,
    /// Wallet code, part of the path.
    #[serde(skip)]
    pub wallet_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_joined")]
    pub tx_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_joined")]
    pub addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time_order: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

/// One transaction with its inputs and outputs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TxDetail {
    pub id: i64,
    pub domain_id: String,
    pub wallet_code: String,
    pub wallet_type: String,
    pub coin_name: String,
    pub order_no: String,
    pub block_height: i64,
    pub confirm_ratio: Option<String>,
    pub tx_id: String,
    pub tx_size: i64,
    pub tx_type: String,
    pub withdraw_amount: Option<Decimal>,
    pub gas_price: Option<String>,
    pub gas_limit: Option<String>,
    pub tx_fee: Decimal,
    pub miner_reward: Option<String>,
    pub deposit_amount: Decimal,
    pub wallet_balance: Decimal,
    pub tx_status: String,
    pub remark_detail: Option<String>,
    pub tx_time_stamp: i64,
    pub create_time_stamp: i64,
    pub vins: Vec<TxEntry>,
    pub vouts: Vec<TxEntry>,
}

/// Input or output of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TxEntry {
    pub address: String,
    #[serde(rename = "idx")]
    pub index: i64,
    pub tag: Option<String>,
    pub amount: Decimal,
    pub balance: Decimal,
    pub is_change: i64,
    pub desc: Option<String>,
}

/// Query of `GET .../wallets/{wallet_code}/addresses`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddressesQuery {
    /// Business line id, part of the path.
    #[serde(skip)]
    pub b_id: String,
    /// Wallet code, part of the path.
    #[serde(skip)]
    pub wallet_code: String,
    pub coin_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_no_coin_address: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// `DESC` or `ASC`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_wallet_address: Option<bool>,
}

/// One address of a wallet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AddressInfo {
    pub domain_id: String,
    pub b_id: String,
    pub wallet_code: String,
    pub wallet_type: String,
    pub address: String,
    /// e.g. `NORMAL_ADDRESS`.
    pub address_type: String,
    /// `COLD` or `HOT`.
    pub address_storage: String,
    pub coin_name: String,
    pub bch_address_format: Option<String>,
    pub description: String,
    pub freeze_amount: Decimal,
    pub total_amount: Decimal,
    pub available_amount: Decimal,
}

/// List values go on the wire as one comma separated value.
fn comma_joined<S: Serializer>(values: &[String], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&values.join(","))
}
