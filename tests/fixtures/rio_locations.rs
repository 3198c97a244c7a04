//! Real Rio de Janeiro attractions for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Visit durations, entry costs,
//! and opening hours are plausible values for each site.

use tour_planner::haversine::HaversineMatrices;
use tour_planner::model::Attraction;
use tour_planner::transport::TransportContext;

use super::AttractionBuilder;

/// A dozen classic Rio sights across five neighborhoods.
pub fn rio_attractions() -> Vec<Attraction> {
    vec![
        AttractionBuilder::new("Cristo Redentor")
            .neighborhood("Cosme Velho")
            .coords(-22.9519, -43.2105)
            .visit(120.0)
            .cost(65.0)
            .hours(8.0 * 60.0, 19.0 * 60.0)
            .build(),
        AttractionBuilder::new("Pao de Acucar")
            .neighborhood("Urca")
            .coords(-22.9486, -43.1566)
            .visit(150.0)
            .cost(120.0)
            .hours(8.0 * 60.0, 20.0 * 60.0)
            .build(),
        AttractionBuilder::new("Praia de Copacabana")
            .neighborhood("Copacabana")
            .coords(-22.9719, -43.1825)
            .visit(90.0)
            .cost(0.0)
            .open_all_day()
            .build(),
        AttractionBuilder::new("Praia de Ipanema")
            .neighborhood("Ipanema")
            .coords(-22.9868, -43.2065)
            .visit(90.0)
            .cost(0.0)
            .open_all_day()
            .build(),
        AttractionBuilder::new("Jardim Botanico")
            .neighborhood("Jardim Botanico")
            .coords(-22.9674, -43.2249)
            .visit(120.0)
            .cost(15.0)
            .hours(8.0 * 60.0, 17.0 * 60.0)
            .build(),
        AttractionBuilder::new("Museu do Amanha")
            .neighborhood("Centro")
            .coords(-22.8945, -43.1797)
            .visit(110.0)
            .cost(30.0)
            .hours(10.0 * 60.0, 18.0 * 60.0)
            .build(),
        AttractionBuilder::new("Escadaria Selaron")
            .neighborhood("Centro")
            .coords(-22.9153, -43.1791)
            .visit(30.0)
            .cost(0.0)
            .open_all_day()
            .build(),
        AttractionBuilder::new("Theatro Municipal")
            .neighborhood("Centro")
            .coords(-22.9086, -43.1764)
            .visit(60.0)
            .cost(20.0)
            .hours(11.0 * 60.0, 17.0 * 60.0)
            .build(),
        AttractionBuilder::new("Parque Lage")
            .neighborhood("Jardim Botanico")
            .coords(-22.9608, -43.2119)
            .visit(75.0)
            .cost(0.0)
            .hours(9.0 * 60.0, 17.0 * 60.0)
            .build(),
        AttractionBuilder::new("Forte de Copacabana")
            .neighborhood("Copacabana")
            .coords(-22.9861, -43.1873)
            .visit(80.0)
            .cost(6.0)
            .hours(10.0 * 60.0, 18.0 * 60.0)
            .build(),
        AttractionBuilder::new("Mosteiro de Sao Bento")
            .neighborhood("Centro")
            .coords(-22.8972, -43.1778)
            .visit(45.0)
            .cost(0.0)
            .hours(7.0 * 60.0, 18.0 * 60.0)
            .build(),
        AttractionBuilder::new("Pedra do Arpoador")
            .neighborhood("Ipanema")
            .coords(-22.9889, -43.1934)
            .visit(45.0)
            .cost(0.0)
            .open_all_day()
            .build(),
    ]
}

/// Haversine-estimated transport context over the Rio catalog.
pub fn rio_context(attractions: &[Attraction]) -> TransportContext {
    let names = attractions.iter().map(|a| a.name.clone()).collect();
    TransportContext::new(names, HaversineMatrices::default().build(attractions))
}
