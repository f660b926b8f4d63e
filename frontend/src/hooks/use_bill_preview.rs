use yew::prelude::*;
use shared::billing::{summarize, BillDetail, BillSummary, SummaryFallbacks};
use wasm_bindgen_futures::spawn_local;
use crate::services::api::ApiClient;

#[derive(Clone, PartialEq)]
pub enum PreviewLoad {
    Loading,
    Loaded { detail: BillDetail, summary: BillSummary },
    Error(String),
}

/// Fetches one bill's print payload and derives its summary.
#[hook]
pub fn use_bill_preview(
    api_client: &ApiClient,
    quotation_id: String,
    bill_id: String,
    fallbacks: SummaryFallbacks,
) -> PreviewLoad {
    let load = use_state(|| PreviewLoad::Loading);

    use_effect_with((quotation_id, bill_id), {
        let api_client = api_client.clone();
        let load = load.clone();
        move |(quotation_id, bill_id)| {
            let quotation_id = quotation_id.clone();
            let bill_id = bill_id.clone();
            load.set(PreviewLoad::Loading);
            spawn_local(async move {
                match api_client.get_bill_detail(&quotation_id, &bill_id).await {
                    Ok(detail) => {
                        let summary = summarize(&detail, &fallbacks);
                        if summary.grand_total_recalculated || summary.sub_total_recalculated {
                            log::info!(
                                target: "bill-preview",
                                "Bill {} totals recalculated from items",
                                quotation_id
                            );
                        }
                        load.set(PreviewLoad::Loaded { detail, summary });
                    }
                    Err(e) => {
                        log::error!(target: "bill-preview", "Failed to load bill {}: {}", quotation_id, e);
                        load.set(PreviewLoad::Error(e.to_string()));
                    }
                }
            });
            || ()
        }
    });

    (*load).clone()
}
