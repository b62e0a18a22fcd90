//! Fixed demo dataset loaded at startup.

/// A business to insert when reseeding; ids are generated at insert time.
#[derive(Debug, Clone, Copy)]
pub struct SeedBusiness {
    pub name: &'static str,
    pub industry: &'static str,
}

const fn seed(name: &'static str, industry: &'static str) -> SeedBusiness {
    SeedBusiness { name, industry }
}

pub const DEMO_BUSINESSES: &[SeedBusiness] = &[
    seed("Global Tech Solutions", "Technology"),
    seed("Apex Industries", "Manufacturing"),
    seed("Blue Harbor Logistics", "Logistics"),
    seed("Catalyst Consulting", "Consulting"),
    seed("Digital Dynamics", "Software Development"),
    seed("Eclipse Software", "Software Development"),
    seed("Fusion Financial", "Financial Services"),
    seed("Green Valley Foods", "Food Production"),
    seed("Highland Manufacturing", "Manufacturing"),
    seed("Innovation Labs", "Technology"),
    seed("Jupiter Electronics", "Electronics"),
    seed("Kinetic Energy Corp", "Energy"),
];
