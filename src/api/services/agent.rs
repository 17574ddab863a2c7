//! Agent 任务端点

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace, warn};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_response, success_response};
use super::sse::{RelayDrop, SseSettings, relay_channel, task_event_stream};
use crate::agent::{NewTask, TaskEvent, TaskOrchestrator};

fn task_not_found(task_id: &str) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::TaskNotFound,
        &format!("Task '{}' not found", task_id),
    )
}

/// 提交新任务，立即返回排队中的任务
pub async fn submit_task(
    body: web::Json<NewTask>,
    orchestrator: web::Data<Arc<dyn TaskOrchestrator>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        orchestrator.submit(body.into_inner()).await,
        ErrorCode::TaskNotFound,
    ))
}

pub async fn get_task(
    path: web::Path<String>,
    orchestrator: web::Data<Arc<dyn TaskOrchestrator>>,
) -> ActixResult<HttpResponse> {
    let task_id = path.into_inner();
    trace!("Agent API: get task {}", task_id);
    Ok(match orchestrator.get_task(&task_id).await {
        Some(task) => success_response(task),
        None => task_not_found(&task_id),
    })
}

/// 以 SSE 推送任务进度
pub async fn stream_task(
    path: web::Path<String>,
    orchestrator: web::Data<Arc<dyn TaskOrchestrator>>,
    settings: web::Data<SseSettings>,
) -> ActixResult<HttpResponse> {
    let task_id = path.into_inner();

    // 先订阅再取快照
    let (tx, rx) = relay_channel(settings.channel_capacity);
    let lagging_id = task_id.clone();
    let subscription = orchestrator.subscribe(
        &task_id,
        Arc::new(move |event: TaskEvent| {
            if let Err(RelayDrop::Lagging) = tx.push(event) {
                warn!("SSE consumer for task {} is lagging, dropping event", lagging_id);
            }
        }),
    );

    let Some(snapshot) = orchestrator.get_task(&task_id).await else {
        return Ok(task_not_found(&task_id));
    };
    info!("Agent API: streaming task {} ({})", task_id, snapshot.status.as_ref());

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        // 避免 Compress 中间件缓冲事件流
        .insert_header((header::CONTENT_ENCODING, "identity"))
        .streaming(task_event_stream(
            snapshot,
            rx,
            subscription,
            *settings.get_ref(),
        )))
}
