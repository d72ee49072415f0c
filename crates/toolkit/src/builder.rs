//! Pure mapping from normalized parameters to transaction bodies.
//!
//! No I/O, no defaults, no validation; by the time parameters arrive here
//! they are fully specified.

use hederakit_core::TransactionBody;

use crate::normalise::{
    AirdropTokenParams, ContractCallParams, CreateTokenParams, CreateTopicParams,
    DeleteTopicParams, HbarTransferParams, MintTokenParams, SubmitTopicMessageParams,
    TokenAssociationParams, UpdateTokenParams, UpdateTopicParams,
};

pub fn transfer_hbar(params: HbarTransferParams) -> TransactionBody {
    TransactionBody::TransferHbar { transfers: params.transfers, memo: params.memo }
}

pub fn create_token(params: CreateTokenParams) -> TransactionBody {
    TransactionBody::TokenCreate {
        name: params.name,
        symbol: params.symbol,
        token_type: params.token_type,
        decimals: params.decimals,
        initial_supply: params.initial_supply,
        treasury_account_id: params.treasury_account_id,
        keys: params.keys,
        memo: params.memo,
    }
}

pub fn update_token(params: UpdateTokenParams) -> TransactionBody {
    TransactionBody::TokenUpdate {
        token_id: params.token_id,
        name: params.name,
        symbol: params.symbol,
        memo: params.memo,
        treasury_account_id: params.treasury_account_id,
        keys: params.keys,
    }
}

pub fn mint_token(params: MintTokenParams) -> TransactionBody {
    TransactionBody::TokenMint {
        token_id: params.token_id,
        amount: params.amount,
        metadata: params.metadata,
    }
}

pub fn associate_token(params: TokenAssociationParams) -> TransactionBody {
    TransactionBody::TokenAssociate { account_id: params.account_id, token_ids: params.token_ids }
}

pub fn dissociate_token(params: TokenAssociationParams) -> TransactionBody {
    TransactionBody::TokenDissociate { account_id: params.account_id, token_ids: params.token_ids }
}

pub fn airdrop_token(params: AirdropTokenParams) -> TransactionBody {
    TransactionBody::TokenAirdrop {
        token_id: params.token_id,
        sender_id: params.sender_id,
        transfers: params.transfers,
    }
}

pub fn create_topic(params: CreateTopicParams) -> TransactionBody {
    TransactionBody::TopicCreate {
        memo: params.memo,
        admin_key: params.admin_key,
        submit_key: params.submit_key,
    }
}

pub fn update_topic(params: UpdateTopicParams) -> TransactionBody {
    TransactionBody::TopicUpdate {
        topic_id: params.topic_id,
        memo: params.memo,
        admin_key: params.admin_key,
        submit_key: params.submit_key,
    }
}

pub fn delete_topic(params: DeleteTopicParams) -> TransactionBody {
    TransactionBody::TopicDelete { topic_id: params.topic_id }
}

pub fn submit_topic_message(params: SubmitTopicMessageParams) -> TransactionBody {
    TransactionBody::TopicMessageSubmit { topic_id: params.topic_id, message: params.message }
}

pub fn execute_contract(params: ContractCallParams) -> TransactionBody {
    TransactionBody::ContractExecute {
        contract_id: params.contract_id,
        gas: params.gas,
        payable_tinybars: params.payable_tinybars,
        call_data: params.call_data,
    }
}

#[cfg(test)]
mod tests {
    use hederakit_core::{TinybarTransfer, TransactionBody};

    use super::transfer_hbar;
    use crate::normalise::HbarTransferParams;
    use crate::testutil::account;

    #[test]
    fn mapping_preserves_legs_verbatim() {
        let legs = vec![
            TinybarTransfer { account_id: account("0.0.1002"), amount: 10 },
            TinybarTransfer { account_id: account("0.0.1001"), amount: -10 },
        ];
        let body = transfer_hbar(HbarTransferParams {
            transfers: legs.clone(),
            memo: Some("note".to_string()),
        });

        match body {
            TransactionBody::TransferHbar { transfers, memo } => {
                assert_eq!(transfers, legs);
                assert_eq!(memo.as_deref(), Some("note"));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
