//! 场景测试: 扫码获取Cookie
//!
//! 用户流程:
//! 1. 点击"扫码获取" (新账号) 或某行的"重新获取"
//! 2. 展示二维码,后台每2秒轮询一次,最多50次
//! 3. 拿到Cookie: 关闭二维码、提示成功、展示Cookie、重新加载列表
//! 4. 失败/超时: 关闭二维码并提示
//! 5. 用户关闭二维码: 停止轮询,不再提示
//!
//! 全部使用暂停时钟,等待间隔不占用真实时间。

#[path = "../../cookie-admin/tests/common/mod.rs"]
mod common;

use common::{mocks, records, PresenterEvent, ServiceCall};
use cookie_admin::models::{AcquisitionOutcome, ApiError, NotificationLevel, PollStatus};
use cookie_admin::services::CookieController;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_reacquire_success_reloads_list() {
    let (service, presenter) = mocks();
    service.push_list(records(&["jd_a", "jd_b"]));
    service.push_polls(vec![
        PollStatus::awaiting_scan(),
        PollStatus::awaiting_scan(),
        PollStatus::with_cookie("pt_key=fresh;pt_pin=jd_a;"),
    ]);
    let controller = CookieController::new(service.clone(), presenter.clone());
    controller.load_all().await.unwrap();

    let target = controller.snapshot()[0].clone();
    let started = Instant::now();
    let session = controller.reacquire(&target).await.expect("session should run");
    let elapsed = started.elapsed();

    assert_eq!(
        session.outcome,
        AcquisitionOutcome::Succeeded {
            cookie: "pt_key=fresh;pt_pin=jd_a;".to_string()
        }
    );
    assert_eq!(session.attempt, 3);
    assert_eq!(session.delays, 2);
    assert!(elapsed >= Duration::from_secs(4));
    assert!(elapsed < Duration::from_secs(6));

    // 每次轮询都携带旧Cookie
    let polls: Vec<ServiceCall> = service
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ServiceCall::Poll(_)))
        .collect();
    assert_eq!(polls.len(), 3);
    assert!(polls
        .iter()
        .all(|c| *c == ServiceCall::Poll(target.cookie_value.clone())));

    assert!(presenter.has(&PresenterEvent::ShowQrcode("qr-token-1".to_string())));
    assert!(presenter.has(&PresenterEvent::CloseQrcode));
    assert!(presenter.has(&PresenterEvent::ShowCookie(
        "pt_key=fresh;pt_pin=jd_a;".to_string()
    )));

    let notes = presenter.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "Cookie获取成功");
    assert!(notes[0].is_success());

    // 成功后重新加载列表
    assert_eq!(service.list_calls(), 2);
    assert!(!controller.is_acquiring());
}

#[tokio::test(start_paused = true)]
async fn test_acquire_new_polls_with_empty_hint() {
    let (service, presenter) = mocks();
    service.push_polls(vec![PollStatus::with_cookie("pt_key=new;")]);
    let controller = CookieController::new(service.clone(), presenter.clone());

    let session = controller.acquire_new().await.unwrap();

    assert!(session.outcome.is_final());
    assert_eq!(session.delays, 0);
    assert!(service.calls().contains(&ServiceCall::Poll(String::new())));
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_after_fifty_polls() {
    let (service, presenter) = mocks();
    let controller = CookieController::new(service.clone(), presenter.clone());

    let started = Instant::now();
    let session = controller.acquire_new().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(session.outcome, AcquisitionOutcome::Exhausted);
    assert_eq!(service.poll_calls(), 50);
    assert_eq!(session.delays, 49);
    assert!(elapsed >= Duration::from_secs(98));
    assert!(elapsed < Duration::from_secs(100));

    assert!(presenter.has(&PresenterEvent::CloseQrcode));
    let notes = presenter.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].message, "二维码等待超时,请重新获取");

    // 用尽不重新加载列表
    assert_eq!(service.list_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_failure_stops_immediately() {
    let (service, presenter) = mocks();
    service.push_polls(vec![
        PollStatus::awaiting_scan(),
        PollStatus::failed(500, "二维码已过期"),
    ]);
    let controller = CookieController::new(service.clone(), presenter.clone());

    let session = controller.acquire_new().await.unwrap();

    assert_eq!(
        session.outcome,
        AcquisitionOutcome::Failed {
            message: "二维码已过期".to_string()
        }
    );
    assert_eq!(service.poll_calls(), 2);
    assert_eq!(session.delays, 1);
    assert!(presenter.has(&PresenterEvent::CloseQrcode));
    assert_eq!(presenter.notifications()[0].message, "二维码已过期");
}

#[tokio::test(start_paused = true)]
async fn test_missing_qrcode_never_polls() {
    let (service, presenter) = mocks();
    service.set_qrcode(Ok(None));
    let controller = CookieController::new(service.clone(), presenter.clone());

    let session = controller.acquire_new().await.unwrap();

    assert_eq!(
        session.outcome,
        AcquisitionOutcome::Failed {
            message: "获取二维码失败".to_string()
        }
    );
    assert_eq!(service.calls(), vec![ServiceCall::Qrcode]);

    // 对话框从未打开,也不需要关闭
    let events = presenter.events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, PresenterEvent::ShowQrcode(_) | PresenterEvent::CloseQrcode)));
    assert_eq!(presenter.notifications()[0].message, "获取二维码失败");
}

#[tokio::test(start_paused = true)]
async fn test_qrcode_request_error_is_failure() {
    let (service, presenter) = mocks();
    service.set_qrcode(Err(ApiError::NetworkFailed("connection refused".to_string())));
    let controller = CookieController::new(service.clone(), presenter.clone());

    let session = controller.acquire_new().await.unwrap();

    assert!(matches!(session.outcome, AcquisitionOutcome::Failed { .. }));
    assert_eq!(service.poll_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_second_acquisition_is_ignored_while_active() {
    let (service, presenter) = mocks();
    service.push_polls(vec![
        PollStatus::awaiting_scan(),
        PollStatus::awaiting_scan(),
        PollStatus::with_cookie("pt_key=new;"),
    ]);
    let controller = CookieController::new(service.clone(), presenter.clone());

    let (first, second) = tokio::join!(controller.acquire_new(), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let busy = controller.is_acquiring();
        (busy, controller.acquire_new().await)
    });

    let (busy, second) = second;
    assert!(busy);
    assert!(second.is_none());
    assert!(matches!(
        first.unwrap().outcome,
        AcquisitionOutcome::Succeeded { .. }
    ));

    // 只请求过一次二维码
    assert_eq!(service.count(|c| matches!(c, ServiceCall::Qrcode)), 1);
    assert!(!controller.is_acquiring());

    // 结束后可以重新开始
    service.push_polls(vec![PollStatus::with_cookie("pt_key=again;")]);
    assert!(controller.acquire_new().await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_stops_polling() {
    let (service, presenter) = mocks();
    let controller = CookieController::new(service.clone(), presenter.clone());

    // 轮询发生在 0s/2s/4s,第5秒关闭对话框
    let (session, dismissed) = tokio::join!(controller.acquire_new(), async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        controller.dismiss_qrcode()
    });

    assert!(dismissed);
    let session = session.unwrap();
    assert_eq!(session.outcome, AcquisitionOutcome::Cancelled);
    assert_eq!(service.poll_calls(), 3);

    // 关闭后不再有轮询
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(service.poll_calls(), 3);

    // 用户主动关闭,不提示也不重新加载
    assert!(presenter.notifications().is_empty());
    assert!(!presenter.has(&PresenterEvent::CloseQrcode));
    assert_eq!(service.list_calls(), 0);
    assert!(!controller.is_acquiring());
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_during_in_flight_poll() {
    let (service, presenter) = mocks();
    service.set_poll_delay(Duration::from_secs(1));
    let controller = CookieController::new(service.clone(), presenter.clone());

    // 第一次轮询在途 (0s..1s) 时关闭对话框
    let started = Instant::now();
    let (session, in_flight) = tokio::join!(controller.acquire_new(), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let in_flight = service.poll_calls() == 1 && service.completed_polls() == 0;
        controller.dismiss_qrcode();
        in_flight
    });
    let elapsed = started.elapsed();

    assert!(in_flight);
    let session = session.unwrap();
    assert_eq!(session.outcome, AcquisitionOutcome::Cancelled);

    // 在途请求照常完成,之后不再发起新的轮询
    assert_eq!(service.poll_calls(), 1);
    assert_eq!(service.completed_polls(), 1);
    assert_eq!(session.attempt, 1);
    assert_eq!(session.delays, 0);
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(2));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(service.poll_calls(), 1);
    assert!(presenter.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_before_first_poll() {
    let (service, presenter) = mocks();
    presenter.dismiss_on_show(true);
    let controller = CookieController::new(service.clone(), presenter.clone());

    let session = controller.acquire_new().await.unwrap();

    assert_eq!(session.outcome, AcquisitionOutcome::Cancelled);
    assert_eq!(service.poll_calls(), 0);
    assert!(presenter.has(&PresenterEvent::ShowQrcode("qr-token-1".to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_without_session_is_noop() {
    let (service, presenter) = mocks();
    let controller = CookieController::new(service, presenter.clone());

    assert!(!controller.dismiss_qrcode());
    assert!(!presenter.dismiss_last_qrcode());
}
