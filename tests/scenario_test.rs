use pointlane::application::scheduler::SchedulerConfig;
use pointlane::application::service::PointService;
use pointlane::domain::history::TransactionType;
use pointlane::domain::point::MAX_BALANCE;
use pointlane::error::PointError;

fn service() -> PointService {
    PointService::in_memory(SchedulerConfig::default())
}

#[tokio::test]
async fn test_charge_use_and_overdraw() {
    let service = service();

    let balance = service.charge(7, 500).await.unwrap();
    assert_eq!(balance.point, 500);
    let history = service.histories(7).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!((history[0].r#type, history[0].amount), (TransactionType::Charge, 500));

    assert_eq!(service.use_points(7, 200).await.unwrap().point, 300);

    let err = service.use_points(7, 1_000).await.unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_BALANCE");
    assert_eq!(service.point(7).await.unwrap().point, 300);

    let history = service.histories(7).await.unwrap();
    let summary: Vec<_> = history.iter().map(|e| (e.r#type, e.amount)).collect();
    assert_eq!(
        summary,
        vec![(TransactionType::Charge, 500), (TransactionType::Use, -200)]
    );
}

#[tokio::test]
async fn test_limit_is_enforced() {
    let service = service();
    service.charge(1, MAX_BALANCE - 1).await.unwrap();

    let err = service.charge(1, 2).await.unwrap_err();
    assert!(matches!(err, PointError::BalanceLimitExceeded { .. }));
    assert_eq!(service.point(1).await.unwrap().point, MAX_BALANCE - 1);
    assert_eq!(service.histories(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_and_unknown_users() {
    let service = service();

    for id in [0, -5] {
        assert!(matches!(service.point(id).await, Err(PointError::InvalidId(_))));
        assert!(matches!(service.histories(id).await, Err(PointError::InvalidId(_))));
        // Id is checked regardless of whether the amount is valid.
        assert!(matches!(service.charge(id, 10).await, Err(PointError::InvalidId(_))));
        assert!(matches!(service.charge(id, -10).await, Err(PointError::InvalidId(_))));
        assert!(matches!(service.use_points(id, 10).await, Err(PointError::InvalidId(_))));
        assert!(matches!(service.use_points(id, 0).await, Err(PointError::InvalidId(_))));
    }

    assert!(matches!(service.point(42).await, Err(PointError::UserNotFound(42))));
    assert!(matches!(service.histories(42).await, Err(PointError::HistoryNotFound(42))));
    assert!(matches!(
        service.use_points(42, 1).await,
        Err(PointError::InsufficientBalance { .. })
    ));
}

#[tokio::test]
async fn test_charges_accumulate_in_order() {
    let service = service();
    let amounts = [5, 40, 300, 1, 2_000];

    for amount in amounts {
        service.charge(11, amount).await.unwrap();
    }

    assert_eq!(service.point(11).await.unwrap().point, amounts.iter().sum::<i64>());
    let history = service.histories(11).await.unwrap();
    assert_eq!(history.len(), amounts.len());
    assert!(history.iter().all(|e| e.r#type == TransactionType::Charge));
    let recorded: Vec<i64> = history.iter().map(|e| e.amount).collect();
    assert_eq!(recorded, amounts);
    assert!(history.windows(2).all(|pair| pair[0].id < pair[1].id));
}
