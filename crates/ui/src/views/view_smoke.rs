use super::test_harness::{FakeApi, ViewKind, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_renders_course_card() {
    let mut harness = setup_view_harness(ViewKind::Catalog, FakeApi::default(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Java Basics"), "missing course title in {html}");
    assert!(html.contains("2 topics · 1 quiz"), "missing counts in {html}");
    assert!(
        html.contains("Certification available: USD 29.00"),
        "missing certification in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness(ViewKind::Catalog, FakeApi::failing(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("The server returned an unexpected response."),
        "missing error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_smoke_opens_first_topic_with_clean_notes() {
    let mut harness = setup_view_harness(ViewKind::Course, FakeApi::default(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Topic 1 of 2"), "missing position in {html}");
    assert!(html.contains("<h1>Variables</h1>"), "missing notes in {html}");
    assert!(html.contains("<strong>int</strong>"), "missing markdown in {html}");
    assert!(!html.contains("<script>"), "script leaked into {html}");
    assert!(html.contains("Loops →"), "missing next link in {html}");
    assert!(!html.contains("Take the quiz"), "first topic has no quiz: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topic_view_smoke_falls_back_to_theory_and_links_quiz() {
    let mut harness =
        setup_view_harness(ViewKind::Topic("loops"), FakeApi::default(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Loops repeat work."), "missing theory in {html}");
    assert!(html.contains("Take the quiz"), "missing quiz link in {html}");
    assert!(html.contains("← Variables"), "missing previous link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topic_view_smoke_reports_unknown_topic() {
    let mut harness =
        setup_view_harness(ViewKind::Topic("arrays"), FakeApi::default(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("That topic is not part of this course."),
        "missing error in {html}"
    );
    assert!(html.contains("Back to courses"), "missing escape link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_asks_signed_out_user_to_sign_in() {
    let mut harness = setup_view_harness(ViewKind::Quiz, FakeApi::default(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Sign in to take quizzes"), "missing prompt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_offers_resume_after_partial_attempt() {
    let mut harness = setup_view_harness(ViewKind::Quiz, FakeApi::with_answered(2), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("You have answered 2 of 5 questions."),
        "missing resume prompt in {html}"
    );
    assert!(html.contains("Resume"), "missing resume button in {html}");
    assert!(html.contains("Start over"), "missing restart button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_blocks_completed_quiz() {
    let mut harness = setup_view_harness(ViewKind::Quiz, FakeApi::with_completed(), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz already completed"), "missing block in {html}");
    assert!(html.contains("Back to course"), "missing exit in {html}");
    assert!(!html.contains("Loop question"), "question leaked into {html}");
    assert!(!html.contains("Start quiz"), "start offered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_fresh_quiz_shows_intro() {
    let mut harness = setup_view_harness(ViewKind::Quiz, FakeApi::default(), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Loops quiz"), "missing title in {html}");
    assert!(html.contains("5 questions · 5:00 to complete · pass at 70%"), "{html}");
    assert!(html.contains("Start quiz"), "missing start in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn editor_view_smoke_renders_starter_template() {
    let mut harness = setup_view_harness(ViewKind::Editor, FakeApi::default(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Hello, world!"), "missing template in {html}");
    assert!(html.contains("C++"), "missing language option in {html}");
    assert!(html.contains("Preview"), "missing run button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_reflects_session() {
    let mut harness = setup_view_harness(ViewKind::Login, FakeApi::default(), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Need an account? Sign up"), "missing toggle in {html}");
    assert!(html.contains("Continue with Google"), "missing google in {html}");
    assert!(!html.contains("Signed in as"), "unexpected session in {html}");

    harness
        .session
        .login("ada@example.com", "secret1")
        .await
        .expect("sign in");
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains("Signed in as ada@example.com"), "missing user in {html}");
}
