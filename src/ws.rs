use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use chrono::Local;
use serde::Serialize;
use serde_json::json;

use crate::executor::LoadGenerator;
use crate::models::{StressResult, StressTestRequest};

/// WebSocket session. Each text frame is a test request; the reply is the
/// finished report. One test runs at a time per session.
pub struct WsSession {
    generator: LoadGenerator,
    running: bool,
}

#[derive(Serialize)]
struct WsReport<'a> {
    timestamp: String,
    #[serde(flatten)]
    result: &'a StressResult,
}

impl WsSession {
    pub fn new(generator: LoadGenerator) -> Self {
        Self {
            generator,
            running: false,
        }
    }

    fn start_test(&mut self, request: StressTestRequest, ctx: &mut ws::WebsocketContext<Self>) {
        let config = match request.validate() {
            Ok(config) => config,
            Err(e) => {
                ctx.text(error_frame(&e.to_string()));
                return;
            }
        };

        self.running = true;
        let generator = self.generator.clone();
        let run = async move { generator.run(&config).await };

        ctx.spawn(run.into_actor(self).map(|outcome, act, ctx| {
            act.running = false;
            let frame = match outcome {
                Ok(result) if result.total == 0 => error_frame("No requests were executed."),
                Ok(result) => {
                    let report = WsReport {
                        timestamp: Local::now().format("%Y/%m/%d %H:%M:%S").to_string(),
                        result: &result,
                    };
                    serde_json::to_string(&report)
                        .unwrap_or_else(|e| error_frame(&format!("failed to encode report: {}", e)))
                }
                Err(e) => error_frame(&e.to_string()),
            };
            ctx.text(frame);
        }));
    }
}

fn error_frame(message: &str) -> String {
    json!({ "error": message }).to_string()
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!("websocket session started");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                if self.running {
                    ctx.text(error_frame("a stress test is already running on this session"));
                    return;
                }
                match serde_json::from_str::<StressTestRequest>(&text) {
                    Ok(request) => self.start_test(request, ctx),
                    Err(e) => ctx.text(error_frame(&format!("invalid request: {}", e))),
                }
            }
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                tracing::warn!(error = %e, "websocket protocol error");
                ctx.stop();
            }
            _ => {}
        }
    }
}

pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    generator: web::Data<LoadGenerator>,
) -> Result<HttpResponse, Error> {
    ws::start(WsSession::new(generator.get_ref().clone()), &req, stream)
}
