use rust_decimal::Decimal;
use serde::Deserialize;

use hederakit_core::{
    hbar_to_tinybars, ContractId, ExecutionContext, KitError, ValidationReport,
};

use crate::abi::{self, AbiValue};
use crate::resolver;

const DEFAULT_GAS: u64 = 100_000;

/// Raw contract call. The target and any address arguments may be native
/// ids or EVM addresses; arguments are typed explicitly so encoding never
/// guesses.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteContractRequest {
    pub contract_id: String,
    pub function_name: String,
    #[serde(default)]
    pub function_args: Vec<AbiArgInput>,
    #[serde(default)]
    pub gas: Option<u64>,
    #[serde(default)]
    pub payable_amount: Option<Decimal>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AbiArgInput {
    Address(String),
    Uint256(UintInput),
    Bool(bool),
    String(String),
    Bytes(String),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum UintInput {
    Number(u64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCallParams {
    pub contract_id: ContractId,
    pub gas: u64,
    pub payable_tinybars: i64,
    pub call_data: Vec<u8>,
}

pub async fn normalise_execute_contract(
    raw: &ExecuteContractRequest,
    context: &ExecutionContext,
) -> Result<ContractCallParams, KitError> {
    let mut report = ValidationReport::new();

    if raw.function_name.trim().is_empty() {
        report.push("functionName", "missing required value");
    } else if !raw
        .function_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        report.push("functionName", "must be a bare function name, not a signature");
    }

    let payable_tinybars = match raw.payable_amount {
        None => 0,
        Some(amount) if amount < Decimal::ZERO => {
            report.push("payableAmount", format!("Invalid transfer amount: {amount}"));
            0
        }
        Some(amount) => match hbar_to_tinybars(amount) {
            Ok(tinybars) => tinybars,
            Err(error) => {
                report.push("payableAmount", error);
                0
            }
        },
    };

    let gas = raw.gas.unwrap_or(DEFAULT_GAS);
    if gas == 0 {
        report.push("gas", "must be greater than zero");
    }

    // Structural checks are done; everything past here may hit the network.
    report.into_result()?;
    let mut report = ValidationReport::new();

    let mut args = Vec::with_capacity(raw.function_args.len());
    for (index, arg) in raw.function_args.iter().enumerate() {
        let field = format!("functionArgs[{index}]");
        match arg {
            AbiArgInput::Address(address) => {
                match resolver::hedera_evm_address(address, context.query.as_ref()).await {
                    Ok(evm) => args.push(AbiValue::Address(evm)),
                    Err(KitError::Validation(reason)) => report.push(field, reason),
                    Err(other) => return Err(other),
                }
            }
            AbiArgInput::Uint256(value) => {
                let parsed = match value {
                    UintInput::Number(n) => Ok(u128::from(*n)),
                    UintInput::Text(text) => text
                        .parse::<u128>()
                        .map_err(|_| format!("`{text}` is not an unsigned integer")),
                };
                match parsed {
                    Ok(n) => args.push(AbiValue::Uint(n)),
                    Err(reason) => report.push(field, reason),
                }
            }
            AbiArgInput::Bool(flag) => args.push(AbiValue::Bool(*flag)),
            AbiArgInput::String(text) => args.push(AbiValue::Utf8(text.clone())),
            AbiArgInput::Bytes(material) => {
                let digits = material.strip_prefix("0x").unwrap_or(material);
                match hex::decode(digits) {
                    Ok(bytes) => args.push(AbiValue::Bytes(bytes)),
                    Err(_) => report.push(field, format!("`{material}` is not valid hex")),
                }
            }
        }
    }

    // An EVM-addressed target is resolved back to its native id, which is
    // what the transaction's target field carries.
    let contract_id = if raw.contract_id.starts_with("0x") || raw.contract_id.starts_with("0X") {
        let info = context.query.get_contract_info(&raw.contract_id).await?;
        Some(info.contract_id)
    } else {
        match raw.contract_id.parse::<ContractId>() {
            Ok(id) => Some(id),
            Err(error) => {
                report.push("contractId", error);
                None
            }
        }
    };

    report.into_result()?;

    Ok(ContractCallParams {
        contract_id: contract_id.expect("contract id resolved when report is clean"),
        gas,
        payable_tinybars,
        call_data: abi::encode_call(raw.function_name.trim(), &args),
    })
}
