//! End-to-end searches through the planner with scripted providers

mod common;

use std::sync::atomic::Ordering;

use common::{Fare, FakeFlights, FakeHotels, date, flight_search, hotel_filters, march_fares, planner, today};
use farescan::models::{Stay, TripType};
use farescan::{FarescanError, Price, SearchMode, SearchOutcome, SearchRequest};

fn month_request(trip: TripType) -> SearchRequest {
    SearchRequest {
        mode: SearchMode::FlightHotelMonth {
            year: 2026,
            month: 3,
            top_n: 10,
            flight: flight_search(trip, 3),
        },
        hotel: hotel_filters(),
    }
}

#[tokio::test]
async fn test_month_search_combines_cheapest_flight_and_hotel() {
    let planner = planner(march_fares(), FakeHotels::priced(&[410_000.0, 380_000.0]));

    let outcome = planner
        .search(&month_request(TripType::RoundTrip), today())
        .await
        .unwrap();

    let SearchOutcome::FlightHotelMonth {
        flight,
        hotels,
        combined,
    } = outcome
    else {
        panic!("expected a flight_hotel_month outcome");
    };

    assert_eq!(flight.depart_date, date(3, 12));
    assert_eq!(flight.return_date, Some(date(3, 15)));
    assert_eq!(flight.price, Price::new(95.0, "USD"));

    assert_eq!(hotels.len(), 2);
    assert_eq!(hotels[0].price.amount, 380_000.0);
    assert_eq!(hotels[0].rank, 1);

    assert_eq!(combined.itinerary.price, Price::new(128_250.0, "KRW"));
    assert_eq!(combined.hotel.hotel_id, hotels[0].hotel_id);
    assert_eq!(combined.stay, Stay::new(date(3, 12), date(3, 15)).unwrap());
    assert_eq!(combined.total, Price::new(508_250.0, "KRW"));
}

#[tokio::test]
async fn test_one_way_month_search_uses_stay_nights() {
    let planner = planner(march_fares(), FakeHotels::priced(&[200_000.0]));

    let outcome = planner
        .search(&month_request(TripType::OneWay), today())
        .await
        .unwrap();

    let SearchOutcome::FlightHotelMonth { flight, combined, .. } = outcome else {
        panic!("expected a flight_hotel_month outcome");
    };
    assert_eq!(flight.return_date, None);
    assert_eq!(combined.stay.check_out, date(3, 15));
}

#[tokio::test]
async fn test_no_hotels_fails_without_partial_total() {
    let planner = planner(march_fares(), FakeHotels::empty());

    let err = planner
        .search(&month_request(TripType::RoundTrip), today())
        .await
        .unwrap_err();
    assert!(matches!(err, FarescanError::NoResults { .. }));
}

#[tokio::test]
async fn test_hotel_outage_is_upstream_failure() {
    let planner = planner(march_fares(), FakeHotels::down());

    let err = planner
        .search(&month_request(TripType::RoundTrip), today())
        .await
        .unwrap_err();
    assert!(matches!(err, FarescanError::Upstream { .. }));
}

#[tokio::test]
async fn test_no_flights_in_month_is_no_results() {
    let planner = planner(FakeFlights::down(), FakeHotels::priced(&[1.0]));

    let err = planner
        .search(&month_request(TripType::RoundTrip), today())
        .await
        .unwrap_err();
    assert!(matches!(err, FarescanError::NoResults { .. }));
}

#[tokio::test]
async fn test_past_dates_are_not_scanned() {
    let flights = FakeFlights::new(vec![
        (date(3, 2), Fare::Priced(10.0, "USD")),
        (date(3, 20), Fare::Priced(110.0, "USD")),
    ]);
    let planner = planner(flights, FakeHotels::priced(&[100_000.0]));

    let outcome = planner
        .search(&month_request(TripType::RoundTrip), date(3, 10))
        .await
        .unwrap();
    let SearchOutcome::FlightHotelMonth { flight, .. } = outcome else {
        panic!("expected a flight_hotel_month outcome");
    };
    assert_eq!(flight.depart_date, date(3, 20));
}

#[tokio::test]
async fn test_month_entirely_in_past_is_rejected() {
    let flights = FakeFlights::default();
    let planner = planner(flights, FakeHotels::priced(&[1.0]));

    let err = planner
        .search(&month_request(TripType::RoundTrip), date(4, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, FarescanError::Validation { .. }));
}

#[tokio::test]
async fn test_missing_exchange_rate_is_validation_error() {
    let flights = FakeFlights::new(vec![(date(3, 5), Fare::Priced(80.0, "EUR"))]);
    let planner = planner(flights, FakeHotels::priced(&[100_000.0]));

    let err = planner
        .search(&month_request(TripType::RoundTrip), today())
        .await
        .unwrap_err();
    assert!(matches!(err, FarescanError::Validation { .. }));
}

#[tokio::test]
async fn test_period_search_keeps_hotels_when_flight_fails() {
    let flights = FakeFlights::down();
    let planner = planner(flights, FakeHotels::priced(&[300_000.0, 250_000.0, 280_000.0]));
    let stay = Stay::new(date(3, 12), date(3, 15)).unwrap();

    let outcome = planner
        .search(
            &SearchRequest {
                mode: SearchMode::FlightHotelPeriod {
                    stay,
                    top_n: 2,
                    flight: flight_search(TripType::RoundTrip, 3),
                },
                hotel: hotel_filters(),
            },
            today(),
        )
        .await
        .unwrap();

    let SearchOutcome::FlightHotelPeriod {
        hotels,
        flight,
        flight_error,
        combined,
    } = outcome
    else {
        panic!("expected a flight_hotel_period outcome");
    };
    assert_eq!(hotels.len(), 2);
    assert_eq!(hotels[0].price.amount, 250_000.0);
    assert!(flight.is_none());
    assert!(combined.is_none());
    assert!(flight_error.unwrap().contains("Flight search"));
}

#[tokio::test]
async fn test_period_search_combines_flight_on_same_dates() {
    let planner = planner(march_fares(), FakeHotels::priced(&[300_000.0]));
    let stay = Stay::new(date(3, 12), date(3, 15)).unwrap();

    let outcome = planner
        .search(
            &SearchRequest {
                mode: SearchMode::FlightHotelPeriod {
                    stay,
                    top_n: 10,
                    flight: flight_search(TripType::RoundTrip, 3),
                },
                hotel: hotel_filters(),
            },
            today(),
        )
        .await
        .unwrap();

    let SearchOutcome::FlightHotelPeriod {
        flight,
        flight_error,
        combined,
        ..
    } = outcome
    else {
        panic!("expected a flight_hotel_period outcome");
    };
    assert_eq!(flight.unwrap().return_date, Some(date(3, 15)));
    assert!(flight_error.is_none());
    assert_eq!(combined.unwrap().total, Price::new(428_250.0, "KRW"));
}

#[tokio::test]
async fn test_hotel_month_search_skips_flights() {
    let flights = FakeFlights::default();
    let planner = planner(flights, FakeHotels::priced(&[150_000.0, 120_000.0]));

    let outcome = planner
        .search(
            &SearchRequest {
                mode: SearchMode::HotelMonth {
                    year: 2026,
                    month: 3,
                    nights: 2,
                },
                hotel: hotel_filters(),
            },
            today(),
        )
        .await
        .unwrap();

    let SearchOutcome::HotelMonth { scan } = outcome else {
        panic!("expected a hotel_month outcome");
    };
    assert_eq!(scan.daily.len(), 31);
    assert_eq!(scan.cheapest.stay.check_in, date(3, 1));
    assert_eq!(scan.cheapest.stay.nights(), 2);
    assert_eq!(scan.cheapest.price.amount, 120_000.0);
}

#[tokio::test]
async fn test_scanner_queries_each_remaining_date_once() {
    let flights = std::sync::Arc::new(march_fares());
    let planner = farescan::TripPlanner::new(
        flights.clone(),
        std::sync::Arc::new(FakeHotels::priced(&[1.0])),
        farescan::ExchangeRates::new([("USD/KRW", 1350.0)]),
    );

    planner
        .search(&month_request(TripType::RoundTrip), today())
        .await
        .unwrap();
    assert_eq!(flights.calls.load(Ordering::SeqCst), 31);
}

#[tokio::test]
async fn test_period_total_does_not_depend_on_hotels_shown() {
    let planner = planner(march_fares(), FakeHotels::priced(&[300_000.0, 250_000.0]));
    let stay = Stay::new(date(3, 12), date(3, 15)).unwrap();

    let outcome = planner
        .search(
            &SearchRequest {
                mode: SearchMode::FlightHotelPeriod {
                    stay,
                    top_n: 0,
                    flight: flight_search(TripType::RoundTrip, 3),
                },
                hotel: hotel_filters(),
            },
            today(),
        )
        .await
        .unwrap();

    let SearchOutcome::FlightHotelPeriod {
        hotels,
        flight_error,
        combined,
        ..
    } = outcome
    else {
        panic!("expected a flight_hotel_period outcome");
    };
    assert!(hotels.is_empty());
    assert!(flight_error.is_none());
    let combined = combined.unwrap();
    assert_eq!(combined.hotel.price.amount, 250_000.0);
    assert_eq!(combined.total, Price::new(378_250.0, "KRW"));
}
