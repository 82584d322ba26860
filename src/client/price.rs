// self
use crate::{
	_prelude::*,
	auth::Symbol,
	client::ApiClient,
	http::{ApiRequest, Transport},
	model::PricePoint,
	obs::{self, OperationKind},
};

impl<T> ApiClient<T>
where
	T: ?Sized + Transport,
{
	/// Lists the recorded price history for `symbol`.
	pub async fn find_symbol_price_history(&self, symbol: &Symbol) -> Result<Vec<PricePoint>> {
		obs::observe(OperationKind::Price, "find_symbol_price_history", async {
			let request = ApiRequest::get(self.descriptor.endpoints.price_history_for(symbol));

			self.execute_json(&request).await
		})
		.await
	}

	/// Returns the latest price for `symbol`.
	pub async fn find_symbol_current_price(&self, symbol: &Symbol) -> Result<PricePoint> {
		obs::observe(OperationKind::Price, "find_symbol_current_price", async {
			let request = ApiRequest::get(self.descriptor.endpoints.current_price_for(symbol));

			self.execute_json(&request).await
		})
		.await
	}
}
