//! Walks the paged `countries` resource of a local mock API with the default reqwest transport,
//! then turns around at the end of the result set.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use lufthansa_api::{
	client::Api,
	config::ClientConfig,
	context::Context,
	reference::{LanguageCode, RefParams},
};

fn page(server: &MockServer, codes: &[(&str, &str)], links: &[(&str, &str)]) -> String {
	let items = codes
		.iter()
		.map(|(code, name)| {
			format!(
				r#"{{"CountryCode":"{code}","Names":{{"Name":{{"@LanguageCode":"EN","$":"{name}"}}}}}}"#
			)
		})
		.collect::<Vec<_>>()
		.join(",");
	let links = links
		.iter()
		.map(|(rel, query)| {
			format!(
				r#"{{"@Rel":"{rel}","@Href":"{}"}}"#,
				server.url(format!("/mds-references/countries/{query}"))
			)
		})
		.collect::<Vec<_>>()
		.join(",");

	format!(
		r#"{{"CountryResource":{{"Countries":{{"Country":[{items}]}},"Meta":{{"@Version":"1.0.0","Link":[{links}],"TotalCount":4}}}}}}"#
	)
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let first = page(&server, &[("DE", "Germany"), ("DK", "Denmark")], &[
		("self", "?lang=EN&limit=2&offset=1"),
		("next", "?lang=EN&limit=2&offset=3"),
	]);
	let second = page(&server, &[("FR", "France"), ("IT", "Italy")], &[
		("self", "?lang=EN&limit=2&offset=3"),
		("previous", "?lang=EN&limit=2&offset=1"),
	]);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/mds-references/countries/").query_param("offset", "3");
			then.status(200).header("content-type", "application/json").body(second.as_str());
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/mds-references/countries/").query_param("offset", "1");
			then.status(200).header("content-type", "application/json").body(first.as_str());
		})
		.await;

	let config = ClientConfig::builder("demo-client", "demo-secret")
		.base_url(Url::parse(&server.base_url())?)
		.build()?;
	let ctx = Context::new();
	let api = Arc::new(Api::connect(config, &ctx).await?);
	let params = RefParams::new().lang(LanguageCode::new("en")?).limit(2).offset(1);
	let cursor = api.countries(&params)?;

	while cursor.next(&ctx).await {
		for country in cursor.items().await {
			println!("{country}");
		}
	}

	if let Some(e) = cursor.error().await {
		return Err(color_eyre::eyre::eyre!("Pagination stopped early: {e}."));
	}
	if cursor.previous(&ctx).await {
		println!("Back on the page holding {} countries.", cursor.items().await.len());
	}

	Ok(())
}
