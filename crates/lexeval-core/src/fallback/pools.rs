//! Static fallback catalogs.
//!
//! Served in place of provider output whenever the provider is unavailable.
//! Entries are fixed at compile time.

use serde::Serialize;

/// One block of the default daily schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleBlock {
    /// Start time, 24h `HH:MM`
    pub time: &'static str,

    pub task: &'static str,

    /// Minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u16,

    /// Why this block sits where it does
    pub reason: &'static str,
}

/// Default behavioral insight: observed patterns, correlations between
/// them, and recommendations that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BehaviorPatterns {
    pub patterns: &'static [&'static str],
    pub correlations: &'static [&'static str],
    pub recommendations: &'static [&'static str],
}

pub static ADVICE_TIPS: [&str; 30] = [
    "Divide las tareas grandes en pasos pequeños y concretos.",
    "Empieza el día con la tarea más importante, no con la más urgente.",
    "Agrupa las tareas similares para reducir el cambio de contexto.",
    "Reserva bloques de concentración sin notificaciones.",
    "Haz una pausa breve cada 50 minutos de trabajo.",
    "Revisa tus prioridades al final de cada día.",
    "Anota las ideas en cuanto aparezcan para liberar la mente.",
    "Establece una hora fija para consultar el correo.",
    "Aprende a decir que no a compromisos que no encajan con tus objetivos.",
    "Planifica la semana el domingo o el lunes a primera hora.",
    "Duerme entre siete y ocho horas para mantener la concentración.",
    "Bebe agua con regularidad durante la jornada.",
    "Sal a caminar diez minutos después de comer.",
    "Celebra los pequeños avances, no solo los grandes logros.",
    "Define un objetivo claro para cada sesión de trabajo.",
    "Elimina una distracción recurrente esta semana.",
    "Usa una sola lista de tareas en lugar de varias dispersas.",
    "Deja preparado el primer paso de mañana antes de terminar hoy.",
    "Limita las reuniones a un propósito y una duración concretos.",
    "Dedica tiempo a una actividad que te recargue de energía.",
    "Revisa qué tareas puedes delegar o automatizar.",
    "Ordena tu espacio de trabajo al terminar la jornada.",
    "Evita revisar el móvil durante la primera hora del día.",
    "Respira profundamente antes de empezar una tarea difícil.",
    "Estima cuánto tiempo te llevará cada tarea y compáralo después.",
    "Reserva un margen libre en tu agenda para imprevistos.",
    "Termina lo que empiezas antes de abrir un frente nuevo.",
    "Repasa tus metas mensuales cada viernes.",
    "Aprovecha tus horas de mayor energía para el trabajo profundo.",
    "Desconecta de las pantallas una hora antes de dormir.",
];

pub static MOTIVATIONAL_QUOTES: [&str; 12] = [
    "Cada pequeño paso cuenta.",
    "La constancia vence al talento cuando el talento no es constante.",
    "No tienes que hacerlo perfecto, solo tienes que empezar.",
    "El progreso, no la perfección, es lo que importa.",
    "Hoy es un buen día para avanzar un poco más.",
    "La disciplina es elegir entre lo que quieres ahora y lo que más quieres.",
    "Lo que haces cada día importa más que lo que haces de vez en cuando.",
    "Un objetivo sin un plan es solo un deseo.",
    "La motivación te pone en marcha; el hábito te mantiene en camino.",
    "Descansar también es parte del trabajo.",
    "Las grandes metas se alcanzan con pequeñas victorias diarias.",
    "Confía en el proceso y sigue adelante.",
];

pub static BEHAVIOR_PATTERNS: BehaviorPatterns = BehaviorPatterns {
    patterns: &[
        "Mayor productividad durante las primeras horas de la mañana.",
        "Descenso de energía después de la comida.",
        "Las tareas largas tienden a posponerse hasta el final del día.",
        "Más interrupciones en los días con muchas reuniones.",
    ],
    correlations: &[
        "Dormir menos de siete horas se asocia con menos tareas completadas.",
        "Las pausas regulares coinciden con una concentración más sostenida.",
        "Planificar el día la noche anterior reduce el tiempo de arranque.",
    ],
    recommendations: &[
        "Programa el trabajo que exige más concentración por la mañana.",
        "Reserva la tarde para tareas administrativas y reuniones.",
        "Divide las tareas largas en bloques de no más de 90 minutos.",
        "Protege al menos un bloque diario libre de reuniones.",
    ],
};

pub static DAILY_SCHEDULE: [ScheduleBlock; 8] = [
    ScheduleBlock {
        time: "07:30",
        task: "Rutina de mañana y desayuno",
        duration_minutes: 45,
        reason: "Empezar el día sin prisas mejora el foco posterior.",
    },
    ScheduleBlock {
        time: "08:30",
        task: "Planificación del día",
        duration_minutes: 15,
        reason: "Fijar prioridades antes de abrir el correo.",
    },
    ScheduleBlock {
        time: "08:45",
        task: "Trabajo profundo",
        duration_minutes: 120,
        reason: "Las primeras horas concentran la mayor energía.",
    },
    ScheduleBlock {
        time: "10:45",
        task: "Pausa activa",
        duration_minutes: 15,
        reason: "Moverse recupera la atención.",
    },
    ScheduleBlock {
        time: "11:00",
        task: "Reuniones y comunicación",
        duration_minutes: 90,
        reason: "Agrupar las interrupciones en un solo bloque.",
    },
    ScheduleBlock {
        time: "13:30",
        task: "Comida y paseo",
        duration_minutes: 60,
        reason: "Descansar evita el bajón de la tarde.",
    },
    ScheduleBlock {
        time: "14:30",
        task: "Tareas administrativas",
        duration_minutes: 90,
        reason: "Trabajo de menor exigencia para la franja de menos energía.",
    },
    ScheduleBlock {
        time: "16:00",
        task: "Revisión y preparación de mañana",
        duration_minutes: 30,
        reason: "Cerrar el día con el primer paso de mañana definido.",
    },
];
