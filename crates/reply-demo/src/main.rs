//! Demo server for the `reply` helpers.
//!
//! Loads `views/` at startup, then serves:
//!
//! - `GET /` renders `index.html`
//! - `GET /cars/{id}` renders `car.html` with the id as a route parameter
//! - `GET /cars.json` answers with JSON (indented unless `REPLY_ENV=production`)
//! - `GET /hello` answers with a plain string
//! - `GET /pixel` answers with raw bytes
//! - `GET /admin` answers `403 Forbidden`
//! - `GET /missing` asks for a template that does not exist
//!
//! Anything else is a `404`. Set `RUST_LOG=debug` to see each template load.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use reply::{
    write_bytes, write_error, write_json, write_status, write_string, write_template, Config,
    Context, Error, FuncMap, Templates, TEMPLATE_DIR_ENV_VAR,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const ADDR_ENV_VAR: &str = "REPLY_DEMO_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

// 1x1 transparent GIF
const PIXEL: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff\x21\xf9\x04\x01\x00\x00\x00\x00\x2c\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02\x44\x01\x00\x3b";

#[derive(Debug, Serialize)]
struct Car {
    id: u32,
    make: &'static str,
    description: &'static str,
}

const CARS: &[Car] = &[
    Car {
        id: 1,
        make: "Fiat",
        description: "Small.\nRed.",
    },
    Car {
        id: 2,
        make: "Volvo",
        description: "Boxy.\nSafe.\nBlue.",
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let templates = Arc::new(load_templates()?);

    let addr: SocketAddr = std::env::var(ADDR_ENV_VAR)
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .context("invalid listen address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("reply demo listening on http://{}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let templates = templates.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let templates = templates.clone();
                async move { Ok::<_, Infallible>(serve(req, &templates).await) }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::error!("Error serving connection: {:?}", err);
            }
        });
    }
}

/// Runs the startup sequence: configuration, functions, then templates.
///
/// Any error here stops the process before it accepts a connection.
fn load_templates() -> anyhow::Result<Templates> {
    let mut config = Config::from_env();
    if std::env::var_os(TEMPLATE_DIR_ENV_VAR).is_none() {
        config = config.with_template_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/views"));
    }
    config.install_mode();

    let mut loader = config.template_loader();
    if loader.is_present() {
        loader.register_functions(
            FuncMap::new()
                .add("to_upper", |s: String| s.to_uppercase())
                .add("to_lower", |s: String| s.to_lowercase()),
        )?;
    }
    let templates = loader
        .load()
        .with_context(|| format!("loading templates from {}", config.template_dir().display()))?;
    Ok(templates)
}

async fn serve(req: Request<Incoming>, templates: &Templates) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read request body");
            Bytes::new()
        }
    };
    let mut ctx = Context::new(Request::from_parts(parts, body));

    if let Err(err) = route(&mut ctx, templates) {
        write_error(&mut ctx, &err);
    }
    ctx.into_response()
}

fn route(ctx: &mut Context, templates: &Templates) -> Result<(), Error> {
    if *ctx.request().method() != Method::GET {
        write_status(ctx, StatusCode::METHOD_NOT_ALLOWED);
        return Ok(());
    }

    let path = ctx.request().uri().path().to_string();
    match path.as_str() {
        "/" => {
            #[derive(Serialize)]
            struct Index<'a> {
                title: &'a str,
                cars: &'a [Car],
            }
            let data = Index {
                title: "Cars",
                cars: CARS,
            };
            write_template(ctx, templates, StatusCode::OK, "index.html", Some(&data))
        }
        "/cars.json" => write_json(ctx, StatusCode::OK, CARS),
        "/hello" => {
            write_string(ctx, StatusCode::OK, "Hello, World!");
            Ok(())
        }
        "/pixel" => {
            write_bytes(ctx, StatusCode::OK, PIXEL);
            Ok(())
        }
        "/admin" => {
            write_status(ctx, StatusCode::FORBIDDEN);
            Ok(())
        }
        "/missing" => write_template::<()>(ctx, templates, StatusCode::OK, "missing.html", None),
        _ => match path.strip_prefix("/cars/").and_then(find_car) {
            Some(car) => {
                ctx.set_param("id", car.id.to_string());
                #[derive(Serialize)]
                struct Page<'a> {
                    title: &'a str,
                    description: &'a str,
                }
                let data = Page {
                    title: car.make,
                    description: car.description,
                };
                write_template(ctx, templates, StatusCode::OK, "car.html", Some(&data))
            }
            None => {
                write_status(ctx, StatusCode::NOT_FOUND);
                Ok(())
            }
        },
    }
}

fn find_car(id: &str) -> Option<&'static Car> {
    let id: u32 = id.parse().ok()?;
    CARS.iter().find(|car| car.id == id)
}
