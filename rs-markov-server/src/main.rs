use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};

use serde::Deserialize;
use rs_markov_core::{MarkovConfig, MarkovError, MarkovModel, SamplingMode};

/// Address used when `RS_MARKOV_ADDR` is not set.
const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// Largest `length` accepted by `/v1/generate`. Generation runs under the model lock.
const MAX_LENGTH: usize = 100_000;

/// Query parameters for the `/v1/train` endpoints.
///
/// Only used by `PUT`, which builds a fresh model. `POST` keeps the existing configuration.
#[derive(Deserialize)]
struct TrainParams {
	window_width: Option<usize>,
	shuffle: Option<bool>,
	sampling: Option<SamplingMode>,
	separator: Option<char>,
	rng_seed: Option<u64>
}

/// Query parameters for the `/v1/generate` endpoint.
#[derive(Deserialize)]
struct GenerateParams {
	length: Option<usize>,
	seed: Option<String> // defaults to the last training text
}

#[derive(Deserialize)]
struct ResetQuery {
	seed: Option<String>
}

/// Model shared across workers, with the text it was last trained on.
#[derive(Default)]
struct SharedData {
	model: Option<MarkovModel>,
	seed_text: String
}

impl TrainParams {
	/// Merges the query parameters over `MarkovConfig::default()`.
	fn config(&self) -> MarkovConfig {
		let mut config = MarkovConfig::default();
		if let Some(window_width) = self.window_width {
			config.window_width = window_width;
		}
		if let Some(shuffle) = self.shuffle {
			config.shuffle_on_generate = shuffle;
		}
		if let Some(sampling) = self.sampling {
			config.sampling = sampling;
		}
		if let Some(separator) = self.separator {
			config.separator = separator;
		}
		config
	}

	fn build_model(&self) -> Result<MarkovModel, MarkovError> {
		let config = self.config();
		match self.rng_seed {
			Some(seed) => MarkovModel::seeded(config, seed),
			None => MarkovModel::new(config),
		}
	}
}

/// PUT /v1/train
///
/// Replaces the shared model with one trained on the request body.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainParams>, body: String) -> impl Responder {
	let mut model = match query.build_model() {
		Ok(m) => m,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string())
	};
	model.train(&body);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	info!("New model trained: {} windows of {} chars", model.key_count(), model.window_width());
	let summary = format!("{} windows", model.key_count());
	shared_data.model = Some(model);
	shared_data.seed_text = body;

	HttpResponse::Ok().body(summary)
}

/// POST /v1/train
///
/// Adds the request body's observations to the current model.
#[post("/v1/train")]
async fn post_train(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let key_count = match shared_data.model.as_mut() {
		Some(model) => {
			model.train(&body);
			model.key_count()
		}
		None => return HttpResponse::Conflict().body("No model trained"),
	};
	if shared_data.seed_text.is_empty() {
		shared_data.seed_text = body;
	}

	HttpResponse::Ok().body(format!("{} windows", key_count))
}

/// GET /v1/generate
///
/// Generates `length` characters (default 200, at most `MAX_LENGTH`) from the shared model.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let length = query.length.unwrap_or(200);
	if length > MAX_LENGTH {
		return HttpResponse::BadRequest().body(format!("Length must be <= {MAX_LENGTH}"));
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let seed_text = query.seed.clone().unwrap_or_else(|| shared_data.seed_text.clone());

	match shared_data.model.as_mut() {
		Some(model) => HttpResponse::Ok().body(model.generate(length, &seed_text)),
		None => {
			warn!("Generation requested before any training");
			HttpResponse::Conflict().body("No model trained")
		}
	}
}

/// POST /v1/reset
///
/// Reloads the generation cursor from `seed` (or the last training text).
#[post("/v1/reset")]
async fn post_reset(data: web::Data<Mutex<SharedData>>, query: web::Query<ResetQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let seed_text = query.seed.clone().unwrap_or_else(|| shared_data.seed_text.clone());

	match shared_data.model.as_mut() {
		Some(model) => {
			model.reset_cursor(&seed_text);
			HttpResponse::Ok().body(model.cursor_window())
		}
		None => HttpResponse::Conflict().body("No model trained"),
	}
}

/// GET /v1/model
///
/// Describes the shared model, one `name: value` per line.
#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match &shared_data.model {
		Some(model) => {
			let config = model.config();
			HttpResponse::Ok().body(format!(
				"window_width: {}\nshuffle: {}\nsampling: {:?}\nseparator: {:?}\nwindows: {}",
				config.window_width,
				config.shuffle_on_generate,
				config.sampling,
				config.separator,
				model.key_count()
			))
		}
		None => HttpResponse::Conflict().body("No model trained"),
	}
}

/// Registers every endpoint.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(put_train)
		.service(post_train)
		.service(get_generated)
		.service(post_reset)
		.service(get_model);
}

/// Main entry point for the server.
///
/// Starts with no model; `PUT /v1/train` must be called first.
/// The model is wrapped in a `Mutex` because generation mutates it.
///
/// # Notes
/// - Binds to `RS_MARKOV_ADDR`, default 127.0.0.1:5000.
/// - Logging is controlled by `RUST_LOG` (default `info`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let addr = std::env::var("RS_MARKOV_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
	let shared_model = web::Data::new(Mutex::new(SharedData::default()));

	info!("Listening on {addr}");
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET", "PUT", "POST"]))
			.app_data(shared_model.clone())
			.configure(configure)
	})
		.bind(addr)?
		.run()
		.await
}
