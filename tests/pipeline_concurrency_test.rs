use price_my_car::testing::StubGenerator;
use price_my_car::{CarListingRequest, LlmVehicleExtractor, PipelineOutcome, PriceTable, PricingPipeline};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_test::assert_ok;

#[tokio::test(start_paused = true)]
async fn test_slow_model_calls_do_not_serialize_requests() {
    let generator = StubGenerator::replying(r#"{"make": "Toyota", "model": "Camry"}"#)
        .with_delay(Duration::from_secs(2));
    let pipeline = Arc::new(PricingPipeline::new(
        LlmVehicleExtractor::new(generator.clone()).with_timeout(Duration::from_secs(10)),
        PriceTable::default_catalog(),
    ));

    let started = tokio::time::Instant::now();
    let mut tasks = JoinSet::new();
    for i in 0..20 {
        let pipeline = pipeline.clone();
        tasks.spawn(async move {
            pipeline
                .run(&CarListingRequest::new(format!("Listing {}", i), "Toyota Camry"))
                .await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let outcome = assert_ok!(joined);
        assert!(matches!(outcome, PipelineOutcome::Success(ref e) if e.price == 5200));
    }

    assert_eq!(generator.call_count(), 20);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_request_is_transport_failure() {
    let generator = StubGenerator::replying(r#"{"make": "Honda", "model": "Civic"}"#)
        .with_delay(Duration::from_secs(120));
    let pipeline = PricingPipeline::new(
        LlmVehicleExtractor::new(generator).with_timeout(Duration::from_secs(30)),
        PriceTable::default_catalog(),
    );

    let outcome = pipeline
        .run(&CarListingRequest::new("Honda Civic", "Runs well"))
        .await;

    match outcome {
        PipelineOutcome::TransportFailure { cause } => assert!(cause.contains("timed out")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}
