// crates.io
use httpmock::prelude::*;
// self
use lufthansa_api::{
	_preludet::*,
	cursor::{Phase, Relation},
	reference::{LanguageCode, RefParams},
};

const COUNTRIES: &str = "/mds-references/countries/";

fn country_page(server: &MockServer, codes: &[&str], links: &[(&str, &str)]) -> String {
	let items = codes
		.iter()
		.map(|code| format!(r#"{{"CountryCode":"{code}"}}"#))
		.collect::<Vec<_>>()
		.join(",");
	let links = links
		.iter()
		.map(|(rel, query)| {
			format!(r#"{{"@Rel":"{rel}","@Href":"{}"}}"#, server.url(format!("{COUNTRIES}{query}")))
		})
		.collect::<Vec<_>>()
		.join(",");

	format!(
		r#"{{"CountryResource":{{"Countries":{{"Country":[{items}]}},"Meta":{{"@Version":"1.0.0","Link":[{links}],"TotalCount":4}}}}}}"#
	)
}

async fn mock_token(server: &MockServer) {
	let body = token_body("cursor-access", 3_600);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(body.as_str());
		})
		.await;
}

async fn mock_country_pages(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
	let first = country_page(server, &["DE", "DK"], &[
		("self", "?limit=2&offset=1"),
		("next", "?limit=2&offset=3"),
		("first", "?limit=2&offset=1"),
		("last", "?limit=2&offset=3"),
	]);
	let second = country_page(server, &["FR", "IT"], &[
		("self", "?limit=2&offset=3"),
		("previous", "?limit=2&offset=1"),
		("first", "?limit=2&offset=1"),
		("last", "?limit=2&offset=3"),
	]);
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path(COUNTRIES).query_param("offset", "1");
			then.status(200).header("content-type", "application/json").body(first.as_str());
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path(COUNTRIES).query_param("offset", "3");
			then.status(200).header("content-type", "application/json").body(second.as_str());
		})
		.await;

	(first, second)
}

#[tokio::test]
async fn cursor_walks_to_the_end_and_back() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let (first, second) = mock_country_pages(&server).await;
	let api = connect_test_api(&server.base_url()).await.expect("Api should connect.");
	let cursor = api
		.countries(&RefParams::new().limit(2).offset(1))
		.expect("Countries cursor should build.");
	let ctx = Context::new();
	let mut seen = Vec::new();

	while cursor.next(&ctx).await {
		seen.extend(cursor.items().await.into_iter().map(|country| country.code));
	}

	assert_eq!(seen, ["DE", "DK", "FR", "IT"]);
	assert!(cursor.error().await.is_none());
	assert_eq!(cursor.phase().await, Phase::Exhausted(Relation::Next));
	assert_eq!(cursor.total_count().await, 4);
	assert!(cursor.previous(&ctx).await);
	assert!(cursor.previous(&ctx).await);
	assert_eq!(
		cursor.items().await.into_iter().map(|country| country.code).collect::<Vec<_>>(),
		["DE", "DK"]
	);
	assert!(cursor.last(&ctx).await);
	assert!(cursor.has_self().await);

	first.assert_calls_async(2).await;
	second.assert_calls_async(3).await;
}

#[tokio::test]
async fn concurrent_first_calls_fetch_the_seed_once() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let (first, second) = mock_country_pages(&server).await;
	let api = connect_test_api(&server.base_url()).await.expect("Api should connect.");
	let cursor = Arc::new(
		api.countries(&RefParams::new().limit(2).offset(1))
			.expect("Countries cursor should build."),
	);
	let ctx = Context::new();
	let tasks = (0..4)
		.map(|_| {
			let cursor = cursor.clone();
			let ctx = ctx.clone();

			tokio::spawn(async move { cursor.next(&ctx).await })
		})
		.collect::<Vec<_>>();

	for task in tasks {
		assert!(task.await.expect("Navigation task should not panic."));
	}

	first.assert_calls_async(1).await;
	second.assert_calls_async(0).await;
}

#[tokio::test]
async fn nearest_airports_decode_from_xml_pages() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let self_url = server.url("/mds-references/airports/nearest/50.033,8.571?lang=EN");
	let body = format!(
		"<NearestAirportResource><Airports>\
		<Airport><AirportCode>FRA</AirportCode><CityCode>FRA</CityCode><CountryCode>DE</CountryCode>\
		<LocationType>Airport</LocationType><Names><Name LanguageCode=\"EN\">Frankfurt</Name></Names>\
		<Distance><Value>0</Value><UOM>KM</UOM></Distance></Airport>\
		<Airport><AirportCode>HHN</AirportCode><CityCode>HHN</CityCode><CountryCode>DE</CountryCode>\
		<LocationType>Airport</LocationType><Names><Name LanguageCode=\"EN\">Hahn</Name></Names>\
		<Distance><Value>93</Value><UOM>KM</UOM></Distance></Airport>\
		</Airports><Meta Version=\"1.0.0\"><Link Rel=\"self\" Href=\"{self_url}\"/>\
		<TotalCount>2</TotalCount></Meta></NearestAirportResource>"
	);
	let nearest = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/mds-references/airports/nearest/50.033,8.571")
				.query_param("lang", "EN");
			then.status(200).header("content-type", "application/xml").body(body.as_str());
		})
		.await;
	let api = connect_test_api(&server.base_url()).await.expect("Api should connect.");
	let lang = LanguageCode::new("en").expect("Language fixture should be valid.");
	let cursor = api
		.nearest_airports(50.03333, 8.57056, Some(lang))
		.expect("Nearest airports cursor should build.");
	let ctx = Context::new();

	assert!(cursor.next(&ctx).await);

	let airports = cursor.items().await;

	assert_eq!(airports.len(), 2);
	assert_eq!(airports[1].code, "HHN");
	assert_eq!(airports[1].distance.as_ref().map(|distance| distance.value), Some(93));
	assert!(cursor.has_self().await);
	assert!(cursor.reload(&ctx).await);
	assert!(!cursor.next(&ctx).await);
	assert!(cursor.error().await.is_none());

	nearest.assert_calls_async(2).await;
}

#[tokio::test]
async fn lh_operated_filter_is_sent() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let airports = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/mds-references/airports/")
				.query_param("limit", "100")
				.query_param("LHoperated", "1");
			then.status(200).header("content-type", "application/json").body(
				r#"{"AirportResource":{"Airports":{"Airport":{"AirportCode":"MUC","CityCode":"MUC","CountryCode":"DE","LocationType":"Airport"}},"Meta":{"@Version":"1.0.0","TotalCount":1}}}"#,
			);
		})
		.await;
	let api = connect_test_api(&server.base_url()).await.expect("Api should connect.");
	let cursor = api
		.airports(&RefParams::new().limit(500), true)
		.expect("Airports cursor should build.");

	assert!(cursor.next(&Context::new()).await);
	assert_eq!(cursor.items().await[0].code, "MUC");
	assert!(!cursor.has_self().await);

	airports.assert_async().await;
}
